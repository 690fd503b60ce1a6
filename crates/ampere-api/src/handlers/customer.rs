//! Customer handlers
//!
//! HTTP handlers for customer management and bill calculation.

use crate::dto::customer::{
    BillRequest, BillResponse, CustomerCreateRequest, CustomerResponse, CustomerUpdateRequest,
};
use crate::dto::{validate_request, ApiResponse, PaginationParams};
use actix_web::{web, HttpResponse};
use ampere_core::config::BillingConfig;
use ampere_core::AppError;
use ampere_db::{PgCustomerRepository, PgMeterRepository, PgSupplierRepository};
use ampere_services::{BillNotifier, BillingService, CustomerService};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{debug, info, instrument};

type PgCustomerService =
    CustomerService<PgCustomerRepository, PgMeterRepository, PgSupplierRepository>;

fn customer_service(pool: &PgPool, billing: &BillingConfig) -> PgCustomerService {
    CustomerService::new(
        Arc::new(PgCustomerRepository::new(pool.clone())),
        Arc::new(PgMeterRepository::new(pool.clone())),
        Arc::new(PgSupplierRepository::new(pool.clone())),
        billing.default_minimum_bill_amount,
    )
}

/// List customers with pagination
///
/// GET /api/v1/customers
#[instrument(skip(pool, billing))]
pub async fn list_customers(
    pool: web::Data<PgPool>,
    billing: web::Data<BillingConfig>,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse, AppError> {
    validate_request(&*query, "Pagination")?;

    debug!(page = query.page, per_page = query.per_page, "Listing customers");

    let (customers, total) = customer_service(&pool, &billing)
        .list(query.limit(), query.offset())
        .await?;

    let response_data: Vec<CustomerResponse> = customers.into_iter().map(Into::into).collect();

    Ok(HttpResponse::Ok().json(query.paginate(response_data, total)))
}

/// Create a new customer
///
/// POST /api/v1/customers
#[instrument(skip(pool, billing, req))]
pub async fn create_customer(
    pool: web::Data<PgPool>,
    billing: web::Data<BillingConfig>,
    req: web::Json<CustomerCreateRequest>,
) -> Result<HttpResponse, AppError> {
    validate_request(&*req, "Customer creation")?;

    let input = req.into_inner().into_new_customer()?;
    let created = customer_service(&pool, &billing).create(input).await?;

    Ok(HttpResponse::Created().json(ApiResponse::with_message(
        CustomerResponse::from(created),
        "Customer created successfully",
    )))
}

/// Get a single customer by ID
///
/// GET /api/v1/customers/{id}
#[instrument(skip(pool, billing))]
pub async fn get_customer(
    pool: web::Data<PgPool>,
    billing: web::Data<BillingConfig>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let customer = customer_service(&pool, &billing)
        .get(path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(CustomerResponse::from(customer))))
}

/// Partially update a customer
///
/// PATCH /api/v1/customers/{id}
#[instrument(skip(pool, billing, req))]
pub async fn update_customer(
    pool: web::Data<PgPool>,
    billing: web::Data<BillingConfig>,
    path: web::Path<i64>,
    req: web::Json<CustomerUpdateRequest>,
) -> Result<HttpResponse, AppError> {
    validate_request(&*req, "Customer update")?;

    let customer_id = path.into_inner();
    debug!(id = customer_id, "Updating customer");

    let updated = customer_service(&pool, &billing)
        .update(customer_id, req.into_inner().into())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::with_message(
        CustomerResponse::from(updated),
        "Customer updated successfully",
    )))
}

/// Delete a customer
///
/// DELETE /api/v1/customers/{id}
#[instrument(skip(pool, billing))]
pub async fn delete_customer(
    pool: web::Data<PgPool>,
    billing: web::Data<BillingConfig>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    customer_service(&pool, &billing)
        .delete(path.into_inner())
        .await?;

    Ok(HttpResponse::NoContent().finish())
}

/// Calculate a customer's bill and email it
///
/// POST /api/v1/customers/{id}/bill
#[instrument(skip(pool, notifier, req))]
pub async fn calculate_bill(
    pool: web::Data<PgPool>,
    notifier: web::Data<BillNotifier>,
    path: web::Path<i64>,
    req: web::Json<BillRequest>,
) -> Result<HttpResponse, AppError> {
    validate_request(&*req, "Bill request")?;

    let customer_id = path.into_inner();
    let billing = BillingService::new(
        Arc::new(PgCustomerRepository::new(pool.get_ref().clone())),
        Arc::new(PgMeterRepository::new(pool.get_ref().clone())),
    );

    let (summary, emailed) = billing
        .calculate_and_notify(customer_id, req.current_reading, &notifier)
        .await?;

    info!(
        id = customer_id,
        bill_amount = %summary.bill_amount,
        emailed,
        "Bill request completed"
    );

    let message = if emailed {
        "Bill calculated and details sent to your respective email."
    } else {
        "Bill calculated."
    };

    Ok(HttpResponse::Ok().json(ApiResponse::with_message(
        BillResponse::from(summary),
        message,
    )))
}

/// Configure customer routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/customers")
            .route("", web::get().to(list_customers))
            .route("", web::post().to(create_customer))
            .route("/{id}", web::get().to(get_customer))
            .route("/{id}", web::patch().to(update_customer))
            .route("/{id}", web::delete().to(delete_customer))
            .route("/{id}/bill", web::post().to(calculate_bill)),
    );
}
