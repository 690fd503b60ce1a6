//! Ampere Billing Server
//!
//! REST backend for electricity billing: customers, shared meters, suppliers
//! and tiered bill calculation.

use actix_cors::Cors;
use actix_web::{http::header, middleware, web, App, HttpResponse, HttpServer};
use ampere_api::{configure_customers, configure_meters, configure_suppliers, health_check};
use ampere_core::AppConfig;
use ampere_db::{create_pool, run_migrations, PgMeterRepository};
use ampere_services::{seed_default_meters, BillNotifier};
use anyhow::Context;
use std::env;
use tracing::info;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Configure API routes
fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .route("/health", web::get().to(health_check))
            .configure(configure_customers)
            .configure(configure_meters)
            .configure(configure_suppliers),
    );
}

/// Initialize tracing/logging
fn init_tracing() {
    let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "ampere_billing={log_level},ampere_api={log_level},ampere_services={log_level},\
             ampere_db={log_level},actix_web=info,sqlx=warn"
        ))
    });

    let registry = tracing_subscriber::registry().with(env_filter);

    if env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json")) {
        registry.with(fmt::layer().json().with_target(true)).init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .init();
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    init_tracing();

    info!("Starting Ampere Billing v{}", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::load().context("Failed to load configuration")?;

    info!("Connecting to database...");
    let pool = create_pool(
        &config.database.url,
        Some(config.database.max_connections),
        Some(config.database.acquire_timeout_secs),
    )
    .await
    .context("Failed to create database pool")?;

    run_migrations(&pool)
        .await
        .context("Failed to apply migrations")?;

    if config.billing.seed_default_meters {
        let seeded = seed_default_meters(&PgMeterRepository::new(pool.clone()))
            .await
            .context("Failed to seed default meters")?;
        info!(seeded, "Meter bootstrap finished");
    }

    let notifier =
        BillNotifier::from_config(&config.notification).context("Failed to build notifier")?;
    info!(
        enabled = notifier.is_enabled(),
        endpoint = %config.notification.email_service_url,
        "Bill notifications configured"
    );

    let bind_addr = config.server_addr();
    let workers = config.server.workers;
    let cors_origins = config.server.cors_origins.clone();
    let billing = config.billing.clone();

    info!(
        "Starting HTTP server on {} with {} workers",
        bind_addr, workers
    );

    HttpServer::new(move || {
        let cors_origins_inner = cors_origins.clone();
        let cors = Cors::default()
            .allowed_origin_fn(move |origin, _req_head| {
                origin.to_str().is_ok_and(|origin_str| {
                    cors_origins_inner
                        .split(',')
                        .any(|o| o.trim() == origin_str)
                })
            })
            .allowed_methods(vec!["GET", "POST", "PATCH", "DELETE", "OPTIONS"])
            .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
            .max_age(3600);

        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(billing.clone()))
            .app_data(web::Data::new(notifier.clone()))
            .app_data(web::JsonConfig::default().error_handler(|err, _req| {
                let error_message = err.to_string();
                actix_web::error::InternalError::from_response(
                    err,
                    HttpResponse::BadRequest().json(serde_json::json!({
                        "error": "invalid_body",
                        "message": error_message,
                        "status": 400
                    })),
                )
                .into()
            }))
            .app_data(web::QueryConfig::default().error_handler(|err, _req| {
                let error_message = err.to_string();
                actix_web::error::InternalError::from_response(
                    err,
                    HttpResponse::BadRequest().json(serde_json::json!({
                        "error": "invalid_query",
                        "message": error_message,
                        "status": 400
                    })),
                )
                .into()
            }))
            .wrap(cors)
            .wrap(TracingLogger::default())
            .wrap(middleware::NormalizePath::trim())
            .configure(configure_routes)
            .route(
                "/",
                web::get().to(|| async {
                    HttpResponse::Found()
                        .append_header(("Location", "/api/v1/health"))
                        .finish()
                }),
            )
    })
    .workers(workers)
    .bind(&bind_addr)
    .with_context(|| format!("Failed to bind {bind_addr}"))?
    .run()
    .await?;

    Ok(())
}
