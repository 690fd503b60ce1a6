//! Supplier handlers

use crate::dto::customer::CustomerResponse;
use crate::dto::supplier::{SupplierRequest, SupplierResponse};
use crate::dto::{validate_request, ApiResponse, PaginationParams};
use actix_web::{web, HttpResponse};
use ampere_core::config::BillingConfig;
use ampere_core::traits::Repository;
use ampere_core::AppError;
use ampere_db::{PgCustomerRepository, PgMeterRepository, PgSupplierRepository};
use ampere_services::CustomerService;
use chrono::Utc;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// List suppliers with pagination
///
/// GET /api/v1/suppliers
#[instrument(skip(pool))]
pub async fn list_suppliers(
    pool: web::Data<PgPool>,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse, AppError> {
    validate_request(&*query, "Pagination")?;

    let repo = PgSupplierRepository::new(pool.get_ref().clone());
    let suppliers = repo.find_all(query.limit(), query.offset()).await?;
    let total = repo.count().await?;

    let response_data: Vec<SupplierResponse> = suppliers.into_iter().map(Into::into).collect();

    Ok(HttpResponse::Ok().json(query.paginate(response_data, total)))
}

/// Create a supplier
///
/// POST /api/v1/suppliers
#[instrument(skip(pool, req))]
pub async fn create_supplier(
    pool: web::Data<PgPool>,
    req: web::Json<SupplierRequest>,
) -> Result<HttpResponse, AppError> {
    validate_request(&*req, "Supplier creation")?;

    let created = PgSupplierRepository::new(pool.get_ref().clone())
        .create(&req.to_supplier()?)
        .await?;

    info!(
        id = created.id,
        supplier_name = %created.supplier_name,
        "Supplier created successfully"
    );

    Ok(HttpResponse::Created().json(ApiResponse::with_message(
        SupplierResponse::from(created),
        "Supplier created successfully",
    )))
}

/// Get a single supplier by ID
///
/// GET /api/v1/suppliers/{id}
#[instrument(skip(pool))]
pub async fn get_supplier(
    pool: web::Data<PgPool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let supplier_id = path.into_inner();

    let supplier = PgSupplierRepository::new(pool.get_ref().clone())
        .find_by_id(supplier_id)
        .await?
        .ok_or(AppError::SupplierNotFound(supplier_id))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(SupplierResponse::from(supplier))))
}

/// Replace a supplier's name and classification
///
/// PATCH /api/v1/suppliers/{id}
#[instrument(skip(pool, req))]
pub async fn update_supplier(
    pool: web::Data<PgPool>,
    path: web::Path<i64>,
    req: web::Json<SupplierRequest>,
) -> Result<HttpResponse, AppError> {
    validate_request(&*req, "Supplier update")?;

    let supplier_id = path.into_inner();
    debug!(id = supplier_id, "Updating supplier");

    let repo = PgSupplierRepository::new(pool.get_ref().clone());
    let mut supplier = repo
        .find_by_id(supplier_id)
        .await?
        .ok_or(AppError::SupplierNotFound(supplier_id))?;

    supplier.supplier_type = req.supplier_type()?;
    supplier.supplier_name.clone_from(&req.supplier_name);
    supplier.updated_at = Utc::now();

    let updated = repo.update(&supplier).await?;
    info!(id = updated.id, "Supplier updated successfully");

    Ok(HttpResponse::Ok().json(ApiResponse::with_message(
        SupplierResponse::from(updated),
        "Supplier updated successfully",
    )))
}

/// Delete a supplier that serves no customers
///
/// DELETE /api/v1/suppliers/{id}
#[instrument(skip(pool))]
pub async fn delete_supplier(
    pool: web::Data<PgPool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let supplier_id = path.into_inner();

    let deleted = PgSupplierRepository::new(pool.get_ref().clone())
        .delete(supplier_id)
        .await?;

    if !deleted {
        return Err(AppError::SupplierNotFound(supplier_id));
    }

    info!(id = supplier_id, "Supplier deleted successfully");
    Ok(HttpResponse::NoContent().finish())
}

/// Customers served by a supplier
///
/// GET /api/v1/suppliers/{id}/customers
#[instrument(skip(pool, billing))]
pub async fn list_supplier_customers(
    pool: web::Data<PgPool>,
    billing: web::Data<BillingConfig>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let service = CustomerService::new(
        Arc::new(PgCustomerRepository::new(pool.get_ref().clone())),
        Arc::new(PgMeterRepository::new(pool.get_ref().clone())),
        Arc::new(PgSupplierRepository::new(pool.get_ref().clone())),
        billing.default_minimum_bill_amount,
    );

    let customers = service.customers_by_supplier(path.into_inner()).await?;
    let response_data: Vec<CustomerResponse> = customers.into_iter().map(Into::into).collect();

    Ok(HttpResponse::Ok().json(ApiResponse::success(response_data)))
}

/// Configure supplier routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/suppliers")
            .route("", web::get().to(list_suppliers))
            .route("", web::post().to(create_supplier))
            .route("/{id}", web::get().to(get_supplier))
            .route("/{id}", web::patch().to(update_supplier))
            .route("/{id}", web::delete().to(delete_supplier))
            .route("/{id}/customers", web::get().to(list_supplier_customers)),
    );
}
