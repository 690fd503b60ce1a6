//! Meter handlers

use crate::dto::meter::{MeterRequest, MeterResponse};
use crate::dto::{validate_request, ApiResponse, PaginationParams};
use actix_web::{web, HttpResponse};
use ampere_core::traits::Repository;
use ampere_core::AppError;
use ampere_db::PgMeterRepository;
use sqlx::PgPool;
use tracing::{debug, info, instrument};

/// List meters with pagination
///
/// GET /api/v1/meters
#[instrument(skip(pool))]
pub async fn list_meters(
    pool: web::Data<PgPool>,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse, AppError> {
    validate_request(&*query, "Pagination")?;

    let repo = PgMeterRepository::new(pool.get_ref().clone());
    let meters = repo.find_all(query.limit(), query.offset()).await?;
    let total = repo.count().await?;

    let response_data: Vec<MeterResponse> = meters.into_iter().map(Into::into).collect();

    Ok(HttpResponse::Ok().json(query.paginate(response_data, total)))
}

/// Create a meter
///
/// POST /api/v1/meters
#[instrument(skip(pool, req))]
pub async fn create_meter(
    pool: web::Data<PgPool>,
    req: web::Json<MeterRequest>,
) -> Result<HttpResponse, AppError> {
    validate_request(&*req, "Meter creation")?;

    let repo = PgMeterRepository::new(pool.get_ref().clone());
    let created = repo.create(&req.to_meter()).await?;

    info!(
        id = created.id,
        load_capacity = created.load_capacity,
        "Meter created successfully"
    );

    Ok(HttpResponse::Created().json(ApiResponse::with_message(
        MeterResponse::from(created),
        "Meter created successfully",
    )))
}

/// Get a single meter by ID
///
/// GET /api/v1/meters/{id}
#[instrument(skip(pool))]
pub async fn get_meter(
    pool: web::Data<PgPool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let meter_id = path.into_inner();

    let meter = PgMeterRepository::new(pool.get_ref().clone())
        .find_by_id(meter_id)
        .await?
        .ok_or(AppError::MeterNotFound(meter_id))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(MeterResponse::from(meter))))
}

/// Replace a meter's capacity and floor
///
/// PATCH /api/v1/meters/{id}
#[instrument(skip(pool, req))]
pub async fn update_meter(
    pool: web::Data<PgPool>,
    path: web::Path<i64>,
    req: web::Json<MeterRequest>,
) -> Result<HttpResponse, AppError> {
    validate_request(&*req, "Meter update")?;

    let meter_id = path.into_inner();
    debug!(id = meter_id, "Updating meter");

    let repo = PgMeterRepository::new(pool.get_ref().clone());
    let mut meter = repo
        .find_by_id(meter_id)
        .await?
        .ok_or(AppError::MeterNotFound(meter_id))?;

    req.apply_to(&mut meter);
    meter.validate()?;
    let updated = repo.update(&meter).await?;

    info!(id = updated.id, "Meter updated successfully");

    Ok(HttpResponse::Ok().json(ApiResponse::with_message(
        MeterResponse::from(updated),
        "Meter updated successfully",
    )))
}

/// Delete a meter no customer is attached to
///
/// DELETE /api/v1/meters/{id}
#[instrument(skip(pool))]
pub async fn delete_meter(
    pool: web::Data<PgPool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let meter_id = path.into_inner();

    let deleted = PgMeterRepository::new(pool.get_ref().clone())
        .delete(meter_id)
        .await?;

    if !deleted {
        return Err(AppError::MeterNotFound(meter_id));
    }

    info!(id = meter_id, "Meter deleted successfully");
    Ok(HttpResponse::NoContent().finish())
}

/// Configure meter routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/meters")
            .route("", web::get().to(list_meters))
            .route("", web::post().to(create_meter))
            .route("/{id}", web::get().to(get_meter))
            .route("/{id}", web::patch().to(update_meter))
            .route("/{id}", web::delete().to(delete_meter)),
    );
}
