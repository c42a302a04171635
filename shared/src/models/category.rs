//! Local-market reject categories

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A reject reason category (e.g. "Botrytis", "Tallo corto")
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub active: bool,
    pub subcategories: Vec<Subcategory>,
}

impl Category {
    /// Subcategories currently offered by the intake UI
    pub fn active_subcategories(&self) -> impl Iterator<Item = &Subcategory> {
        self.subcategories.iter().filter(|s| s.active)
    }

    /// Whether rejections are recorded per subcategory rather than on the
    /// category itself
    pub fn has_active_subcategories(&self) -> bool {
        self.active_subcategories().next().is_some()
    }
}

/// A finer-grained reject reason under a category
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Subcategory {
    pub id: Uuid,
    pub name: String,
    pub active: bool,
}

/// Where a rejection quantity is recorded.
///
/// A category with active subcategories only ever records per-subcategory
/// lines; one without records a single category-level line. The tagged
/// variant makes that branching explicit instead of reconstructing it from
/// string-keyed maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RejectionTarget {
    Category { category: Uuid },
    Subcategory { category: Uuid, subcategory: Uuid },
}

impl RejectionTarget {
    pub fn category(&self) -> Uuid {
        match self {
            RejectionTarget::Category { category } => *category,
            RejectionTarget::Subcategory { category, .. } => *category,
        }
    }

    pub fn subcategory(&self) -> Option<Uuid> {
        match self {
            RejectionTarget::Category { .. } => None,
            RejectionTarget::Subcategory { subcategory, .. } => Some(*subcategory),
        }
    }
}

/// The persisted shape of one rejection line
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RejectionRecord {
    pub category_id: Uuid,
    pub subcategory_id: Option<Uuid>,
    pub quantity: u32,
    pub detail: Option<String>,
}
