//! Local-market rejection ledger
//!
//! Per line-item store of reject quantities keyed by [`RejectionTarget`].
//! Flattening to persisted records branches on the category catalog: a
//! category with active subcategories only ever emits subcategory records,
//! one without emits a single category-level record. The persisted schema
//! depends on that branching, so it is reproduced exactly.

use std::collections::BTreeMap;

use super::fields::CountField;
use crate::models::{Category, RejectionRecord, RejectionTarget};
use crate::normalize::NormalizeError;

/// One rejection line: quantity and optional free-text detail
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RejectionLine {
    pub quantity: CountField,
    pub detail: Option<String>,
}

/// All rejection lines of one entry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RejectionLedger {
    lines: BTreeMap<RejectionTarget, RejectionLine>,
}

impl RejectionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line(&self, target: &RejectionTarget) -> Option<&RejectionLine> {
        self.lines.get(target)
    }

    /// Set a reject quantity from raw text; invalid input is a no-op error
    pub fn set_quantity(&mut self, target: RejectionTarget, raw: &str) -> Result<(), NormalizeError> {
        let field = CountField::parse(raw)?;
        self.lines.entry(target).or_default().quantity = field;
        Ok(())
    }

    /// Set the free-text detail for a line; upper-cased on write, empty
    /// clears it
    pub fn set_detail(&mut self, target: RejectionTarget, text: &str) {
        let line = self.lines.entry(target).or_default();
        let upper = text.trim().to_uppercase();
        line.detail = if upper.is_empty() { None } else { Some(upper) };
    }

    /// Total rejected stems across all lines
    pub fn stem_total(&self) -> u32 {
        self.lines.values().map(|l| l.quantity.value()).sum()
    }

    /// Flatten to persisted records following the categorical branching
    /// rule. Lines whose target does not match the catalog shape are never
    /// emitted.
    pub fn flatten(&self, categories: &[Category]) -> Vec<RejectionRecord> {
        let mut records = Vec::new();
        for category in categories.iter().filter(|c| c.active) {
            if category.has_active_subcategories() {
                for subcategory in category.active_subcategories() {
                    let target = RejectionTarget::Subcategory {
                        category: category.id,
                        subcategory: subcategory.id,
                    };
                    if let Some(record) = self.record_for(&target) {
                        records.push(record);
                    }
                }
            } else {
                let target = RejectionTarget::Category {
                    category: category.id,
                };
                if let Some(record) = self.record_for(&target) {
                    records.push(record);
                }
            }
        }
        records
    }

    fn record_for(&self, target: &RejectionTarget) -> Option<RejectionRecord> {
        let line = self.lines.get(target)?;
        let quantity = line.quantity.value();
        if quantity == 0 {
            return None;
        }
        Some(RejectionRecord {
            category_id: target.category(),
            subcategory_id: target.subcategory(),
            quantity,
            detail: line.detail.clone(),
        })
    }

    /// Seed from persisted records when editing an existing delivery
    pub fn from_records(records: &[RejectionRecord]) -> Self {
        let mut ledger = Self::new();
        for record in records {
            let target = match record.subcategory_id {
                Some(subcategory) => RejectionTarget::Subcategory {
                    category: record.category_id,
                    subcategory,
                },
                None => RejectionTarget::Category {
                    category: record.category_id,
                },
            };
            ledger.lines.insert(
                target,
                RejectionLine {
                    quantity: CountField::from_value(record.quantity),
                    detail: record.detail.clone(),
                },
            );
        }
        ledger
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Subcategory;
    use uuid::Uuid;

    fn leaf_category(id: Uuid) -> Category {
        Category {
            id,
            name: "Botrytis".to_string(),
            active: true,
            subcategories: Vec::new(),
        }
    }

    fn branching_category(id: Uuid, sub_a: Uuid, sub_b: Uuid) -> Category {
        Category {
            id,
            name: "Daño mecánico".to_string(),
            active: true,
            subcategories: vec![
                Subcategory {
                    id: sub_a,
                    name: "Tallo".to_string(),
                    active: true,
                },
                Subcategory {
                    id: sub_b,
                    name: "Botón".to_string(),
                    active: true,
                },
            ],
        }
    }

    #[test]
    fn detail_is_uppercased_and_empty_clears() {
        let cat = Uuid::new_v4();
        let target = RejectionTarget::Category { category: cat };
        let mut ledger = RejectionLedger::new();

        ledger.set_detail(target, "puntas quemadas");
        assert_eq!(
            ledger.line(&target).unwrap().detail.as_deref(),
            Some("PUNTAS QUEMADAS")
        );

        ledger.set_detail(target, "  ");
        assert_eq!(ledger.line(&target).unwrap().detail, None);
    }

    #[test]
    fn flatten_emits_category_record_for_leaf_category() {
        let cat = Uuid::new_v4();
        let categories = vec![leaf_category(cat)];
        let mut ledger = RejectionLedger::new();
        ledger
            .set_quantity(RejectionTarget::Category { category: cat }, "50")
            .unwrap();

        let records = ledger.flatten(&categories);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].category_id, cat);
        assert_eq!(records[0].subcategory_id, None);
        assert_eq!(records[0].quantity, 50);
    }

    #[test]
    fn flatten_never_emits_bare_record_for_branching_category() {
        let cat = Uuid::new_v4();
        let sub_a = Uuid::new_v4();
        let sub_b = Uuid::new_v4();
        let categories = vec![branching_category(cat, sub_a, sub_b)];

        let mut ledger = RejectionLedger::new();
        ledger
            .set_quantity(
                RejectionTarget::Subcategory {
                    category: cat,
                    subcategory: sub_a,
                },
                "30",
            )
            .unwrap();
        // a stray category-level line must not survive flattening
        ledger
            .set_quantity(RejectionTarget::Category { category: cat }, "99")
            .unwrap();

        let records = ledger.flatten(&categories);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].subcategory_id, Some(sub_a));
        assert_eq!(records[0].quantity, 30);
    }
}
