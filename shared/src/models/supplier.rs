//! Supplier models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered stem supplier
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Supplier {
    pub id: Uuid,
    /// Unique intake code typed at the gate (e.g. "FLR01")
    pub code: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Ecuadorian tax id, 13 digits
    pub ruc: Option<String>,
    /// (species, variety) pairs this supplier is authorized to deliver
    pub varieties: Vec<SupplierVariety>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One authorized (species, variety) pair in a supplier's catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SupplierVariety {
    pub species: String,
    pub variety: String,
}

/// Input for creating a supplier from the intake screen
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuickSupplierInput {
    pub code: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub ruc: String,
}

/// Input for growing a supplier's variety catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddVarietyInput {
    pub species: String,
    pub variety: String,
}
