//! Supplier DTOs

use ampere_core::models::{Supplier, SupplierType};
use ampere_core::AppError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Supplier create and update request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SupplierRequest {
    /// Supplier name
    #[validate(length(min = 1, max = 100, message = "Supplier name must be 1-100 characters"))]
    pub supplier_name: String,

    /// `urban` or `rural`
    #[serde(default = "default_supplier_type")]
    #[validate(length(max = 50))]
    pub supplier_type: String,
}

fn default_supplier_type() -> String {
    SupplierType::default().to_string()
}

impl SupplierRequest {
    /// Parsed classification
    ///
    /// # Errors
    ///
    /// `Validation` for anything other than `urban` or `rural`.
    pub fn supplier_type(&self) -> Result<SupplierType, AppError> {
        SupplierType::from_str(&self.supplier_type).ok_or_else(|| {
            AppError::Validation(format!(
                "Invalid supplier type '{}', expected urban or rural",
                self.supplier_type
            ))
        })
    }

    /// Convert to an unsaved supplier
    ///
    /// # Errors
    ///
    /// See [`Self::supplier_type`].
    pub fn to_supplier(&self) -> Result<Supplier, AppError> {
        Ok(Supplier::new(self.supplier_name.clone(), self.supplier_type()?))
    }
}

/// Supplier response
#[derive(Debug, Clone, Serialize)]
pub struct SupplierResponse {
    /// Supplier ID
    pub id: i64,
    /// Supplier name
    pub supplier_name: String,
    /// Classification
    pub supplier_type: SupplierType,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl From<Supplier> for SupplierResponse {
    fn from(s: Supplier) -> Self {
        Self {
            id: s.id,
            supplier_name: s.supplier_name,
            supplier_type: s.supplier_type,
            created_at: s.created_at,
            updated_at: s.updated_at,
        }
    }
}
