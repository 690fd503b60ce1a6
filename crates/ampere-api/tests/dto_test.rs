//! Request/response DTO tests
//!
//! Database-backed handlers are exercised by the service tests; these cover
//! the HTTP-facing conversions and validation rules.

#[cfg(test)]
mod tests {
    use actix_web::{test as actix_test, web, App};
    use ampere_api::dto::{
        BillRequest, BillResponse, CustomerCreateRequest, CustomerUpdateRequest, MeterRequest,
        SupplierRequest,
    };
    use ampere_api::health_check;
    use ampere_core::models::{BillSummary, CustomerPatch, MeterSelection, SupplierType};
    use ampere_core::AppError;
    use rust_decimal_macros::dec;
    use serde_json::json;
    use validator::Validate;

    fn create_request(body: serde_json::Value) -> CustomerCreateRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_create_request_by_load_capacity() {
        let req = create_request(json!({
            "customer_name": "Test Customer",
            "customer_address": "Test Address",
            "connection_date": "2023-09-09",
            "load_capacity": 1,
            "supplier_id": 1
        }));

        assert!(req.validate().is_ok());
        assert_eq!(
            req.meter_selection().unwrap(),
            MeterSelection::ByLoadCapacity(1)
        );

        let input = req.into_new_customer().unwrap();
        assert_eq!(input.supplier_id, 1);
        assert_eq!(input.current_reading, None);
    }

    #[test]
    fn test_explicit_meter_wins_over_capacity() {
        let req = create_request(json!({
            "customer_name": "Test Customer",
            "customer_address": "Test Address",
            "connection_date": "2023-09-09",
            "load_capacity": 3,
            "meter_id": 8,
            "supplier_id": 1
        }));

        assert_eq!(req.meter_selection().unwrap(), MeterSelection::Existing(8));
    }

    #[test]
    fn test_create_request_without_meter_is_rejected() {
        let req = create_request(json!({
            "customer_name": "Test Customer",
            "customer_address": "Test Address",
            "connection_date": "2023-09-09",
            "supplier_id": 1
        }));

        assert!(matches!(
            req.into_new_customer(),
            Err(AppError::MissingField(_))
        ));
    }

    #[test]
    fn test_create_request_validation_rules() {
        let req = create_request(json!({
            "customer_name": "x".repeat(101),
            "customer_address": "Test Address",
            "connection_date": "2023-09-09",
            "load_capacity": -1,
            "supplier_id": 1,
            "email": "not-an-email"
        }));

        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("customer_name"));
        assert!(fields.contains_key("load_capacity"));
        assert!(fields.contains_key("email"));
    }

    #[test]
    fn test_update_request_becomes_sparse_patch() {
        let req: CustomerUpdateRequest = serde_json::from_value(json!({
            "customer_address": "Updated Address"
        }))
        .unwrap();

        assert!(req.validate().is_ok());
        let patch = CustomerPatch::from(req);
        assert_eq!(patch.customer_address.as_deref(), Some("Updated Address"));
        assert_eq!(patch.customer_name, None);
        assert_eq!(patch.current_reading, None);
        assert_eq!(patch.meter_id, None);
    }

    #[test]
    fn test_bill_request_rejects_negative_reading() {
        assert!(BillRequest { current_reading: 100 }.validate().is_ok());
        assert!(BillRequest { current_reading: -5 }.validate().is_err());
    }

    #[test]
    fn test_bill_response_carries_summary_text() {
        let response = BillResponse::from(BillSummary {
            customer_id: 1,
            previous_reading: 0,
            current_reading: 100,
            units_consumed: 100,
            tiered_amount: dec!(300),
            bill_amount: dec!(500),
        });

        assert!(response.minimum_applied);
        assert_eq!(
            response.details,
            "the previous reading was:0\ncurrent reading is 100\ntotal bill amount is 500"
        );
    }

    #[test]
    fn test_meter_request() {
        let req = MeterRequest {
            load_capacity: 5,
            minimum_bill_amount: 900,
        };
        assert!(req.validate().is_ok());

        let meter = req.to_meter();
        assert_eq!(meter.load_capacity, 5);
        assert_eq!(meter.minimum_bill_amount, 900);

        let bad = MeterRequest {
            load_capacity: 5,
            minimum_bill_amount: -1,
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_supplier_request_type_parsing() {
        let req: SupplierRequest = serde_json::from_value(json!({
            "supplier_name": "Valley Grid",
            "supplier_type": "Rural"
        }))
        .unwrap();
        assert_eq!(req.to_supplier().unwrap().supplier_type, SupplierType::Rural);

        let defaulted: SupplierRequest =
            serde_json::from_value(json!({ "supplier_name": "City Power" })).unwrap();
        assert_eq!(defaulted.supplier_type().unwrap(), SupplierType::Urban);

        let bad: SupplierRequest = serde_json::from_value(json!({
            "supplier_name": "Somewhere",
            "supplier_type": "suburban"
        }))
        .unwrap();
        assert!(matches!(bad.supplier_type(), Err(AppError::Validation(_))));
    }

    #[actix_web::test]
    async fn test_health_check() {
        let app = actix_test::init_service(
            App::new().service(web::scope("/api/v1").route("/health", web::get().to(health_check))),
        )
        .await;

        let req = actix_test::TestRequest::get().uri("/api/v1/health").to_request();
        let body: serde_json::Value = actix_test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["status"], "healthy");
        assert_eq!(body["service"], "ampere-billing");
    }
}
