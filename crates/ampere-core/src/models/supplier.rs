//! Supplier model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Supplier classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SupplierType {
    #[default]
    Urban,
    Rural,
}

impl fmt::Display for SupplierType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SupplierType::Urban => write!(f, "urban"),
            SupplierType::Rural => write!(f, "rural"),
        }
    }
}

impl SupplierType {
    /// Parse from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "urban" => Some(SupplierType::Urban),
            "rural" => Some(SupplierType::Rural),
            _ => None,
        }
    }
}

/// Supplier entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplier {
    pub id: i64,
    pub supplier_name: String,
    pub supplier_type: SupplierType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Supplier {
    /// Build an unsaved supplier
    pub fn new(supplier_name: impl Into<String>, supplier_type: SupplierType) -> Self {
        Self {
            id: 0,
            supplier_name: supplier_name.into(),
            supplier_type,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supplier_type_parsing() {
        assert_eq!(SupplierType::from_str("Urban"), Some(SupplierType::Urban));
        assert_eq!(SupplierType::from_str(" RURAL "), Some(SupplierType::Rural));
        assert_eq!(SupplierType::from_str("suburban"), None);
        assert_eq!(SupplierType::Rural.to_string(), "rural");
    }
}
