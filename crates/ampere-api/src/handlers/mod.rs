//! HTTP request handlers

pub mod customer;
pub mod meter;
pub mod supplier;

use actix_web::HttpResponse;

pub use customer::configure as configure_customers;
pub use meter::configure as configure_meters;
pub use supplier::configure as configure_suppliers;

/// Health check endpoint
///
/// GET /api/v1/health
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "ampere-billing",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
