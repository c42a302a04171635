//! Delivery draft state
//!
//! One draft per intake session, modeled as an immutable value plus a
//! reducer: every user intent is a [`DraftAction`] and [`DeliveryDraft::apply`]
//! returns the next draft, leaving the previous one untouched. Malformed
//! numeric input reduces to the unchanged draft, so a bad keystroke can never
//! corrupt state.

mod export;
mod fields;
mod quantity;
mod rejection;
mod totals;

pub use export::{ExportBucket, ExportLedger};
pub use fields::{CountField, PriceField};
pub use quantity::QuantitySource;
pub use rejection::{RejectionLedger, RejectionLine};
pub use totals::{advisories, aggregate, aggregate_payloads, DeliveryTotals, EntryAdvisory};

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::models::{
    Category, Delivery, DeliveryEntry, EntryPayload, RejectionTarget, SaveDeliveryInput, SizeKey,
};

/// One line-item of a draft
#[derive(Debug, Clone, PartialEq)]
pub struct DraftEntry {
    /// Draft-local identity, stable across edits
    pub id: Uuid,
    /// Database identity once saved
    pub persisted_id: Option<Uuid>,
    pub species_name: String,
    pub variety_name: String,
    pub quantity: QuantitySource,
    pub export: ExportLedger,
    pub rejections: RejectionLedger,
}

impl DraftEntry {
    /// A fresh line-item added from the supplier catalog or autocomplete
    pub fn new(species_name: impl Into<String>, variety_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            persisted_id: None,
            species_name: species_name.into(),
            variety_name: variety_name.into(),
            quantity: QuantitySource::new_direct(),
            export: ExportLedger::new(),
            rejections: RejectionLedger::new(),
        }
    }

    /// A line-item loaded from a saved delivery; quantity edits become
    /// add/remove deltas against the persisted value
    pub fn from_persisted(entry: &DeliveryEntry) -> Self {
        Self {
            id: Uuid::new_v4(),
            persisted_id: Some(entry.id),
            species_name: entry.species_name.clone(),
            variety_name: entry.variety_name.clone(),
            quantity: QuantitySource::for_existing(entry.quantity),
            export: ExportLedger::from_maps(&entry.exportable, &entry.prices),
            rejections: RejectionLedger::from_records(&entry.rejections),
        }
    }

    pub fn received_quantity(&self) -> u32 {
        self.quantity.received()
    }

    /// Stems rejected to the local market, counted through the catalog
    /// branching so stray lines never inflate the total
    pub fn local_total(&self, categories: &[Category]) -> u32 {
        self.rejections
            .flatten(categories)
            .iter()
            .map(|r| r.quantity)
            .sum()
    }

    pub fn monetary_total(&self) -> Decimal {
        self.export.monetary_total()
    }

    /// Wire shape for the save payload
    pub fn to_payload(&self, categories: &[Category]) -> EntryPayload {
        EntryPayload {
            species_name: self.species_name.clone(),
            variety_name: self.variety_name.clone(),
            quantity: self.received_quantity(),
            exportable: self.export.quantities(),
            prices: self.export.prices(),
            total_price: self.monetary_total(),
            rejections: self.rejections.flatten(categories),
        }
    }
}

/// One user intent against a draft
#[derive(Debug, Clone)]
pub enum DraftAction {
    AddEntry {
        species_name: String,
        variety_name: String,
    },
    RemoveEntry {
        entry_id: Uuid,
    },
    /// Direct quantity on a new entry
    SetReceivedQuantity {
        entry_id: Uuid,
        raw: String,
    },
    /// Add-delta on an existing entry
    SetAddedQuantity {
        entry_id: Uuid,
        raw: String,
    },
    /// Remove-delta on an existing entry
    SetRemovedQuantity {
        entry_id: Uuid,
        raw: String,
    },
    SetBucketQuantity {
        entry_id: Uuid,
        size: SizeKey,
        raw: String,
    },
    SetBucketPrice {
        entry_id: Uuid,
        size: SizeKey,
        raw: String,
    },
    SetRejectionQuantity {
        entry_id: Uuid,
        target: RejectionTarget,
        raw: String,
    },
    SetRejectionDetail {
        entry_id: Uuid,
        target: RejectionTarget,
        text: String,
    },
}

/// The in-memory, unsaved state of one supplier's delivery
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryDraft {
    pub supplier_id: Uuid,
    /// Persisted identity when editing an existing delivery
    pub delivery_id: Option<Uuid>,
    categories: Vec<Category>,
    entries: Vec<DraftEntry>,
}

impl DeliveryDraft {
    /// An empty draft for a new delivery
    pub fn new(supplier_id: Uuid, categories: Vec<Category>) -> Self {
        Self {
            supplier_id,
            delivery_id: None,
            categories,
            entries: Vec::new(),
        }
    }

    /// A draft seeded from a saved delivery for editing
    pub fn from_delivery(delivery: &Delivery, categories: Vec<Category>) -> Self {
        Self {
            supplier_id: delivery.supplier_id,
            delivery_id: Some(delivery.id),
            categories,
            entries: delivery.entries.iter().map(DraftEntry::from_persisted).collect(),
        }
    }

    pub fn entries(&self) -> &[DraftEntry] {
        &self.entries
    }

    pub fn entry(&self, entry_id: Uuid) -> Option<&DraftEntry> {
        self.entries.iter().find(|e| e.id == entry_id)
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Reduce one action to the next draft. Invalid numeric input and
    /// targets outside the catalog shape reduce to the unchanged draft.
    pub fn apply(&self, action: DraftAction) -> Self {
        let mut next = self.clone();
        match action {
            DraftAction::AddEntry {
                species_name,
                variety_name,
            } => {
                next.entries.push(DraftEntry::new(species_name, variety_name));
            }
            DraftAction::RemoveEntry { entry_id } => {
                next.entries.retain(|e| e.id != entry_id);
            }
            DraftAction::SetReceivedQuantity { entry_id, raw } => {
                next.with_entry(entry_id, |entry| {
                    if let QuantitySource::Direct(_) = entry.quantity {
                        if let Ok(field) = CountField::parse(&raw) {
                            entry.quantity = QuantitySource::Direct(field);
                        }
                    }
                });
            }
            DraftAction::SetAddedQuantity { entry_id, raw } => {
                next.with_entry(entry_id, |entry| {
                    if let QuantitySource::Delta { added, .. } = &mut entry.quantity {
                        if let Ok(field) = CountField::parse(&raw) {
                            *added = field;
                        }
                    }
                });
            }
            DraftAction::SetRemovedQuantity { entry_id, raw } => {
                next.with_entry(entry_id, |entry| {
                    if let QuantitySource::Delta { removed, .. } = &mut entry.quantity {
                        if let Ok(field) = CountField::parse(&raw) {
                            *removed = field;
                        }
                    }
                });
            }
            DraftAction::SetBucketQuantity { entry_id, size, raw } => {
                next.with_entry(entry_id, |entry| {
                    let _ = entry.export.set_quantity(size, &raw);
                });
            }
            DraftAction::SetBucketPrice { entry_id, size, raw } => {
                next.with_entry(entry_id, |entry| {
                    let _ = entry.export.set_price(size, &raw);
                });
            }
            DraftAction::SetRejectionQuantity {
                entry_id,
                target,
                raw,
            } => {
                if self.target_in_catalog(&target) {
                    next.with_entry(entry_id, |entry| {
                        let _ = entry.rejections.set_quantity(target, &raw);
                    });
                }
            }
            DraftAction::SetRejectionDetail {
                entry_id,
                target,
                text,
            } => {
                if self.target_in_catalog(&target) {
                    next.with_entry(entry_id, |entry| {
                        entry.rejections.set_detail(target, &text);
                    });
                }
            }
        }
        next
    }

    /// Delivery-wide totals, recomputed from scratch
    pub fn totals(&self) -> DeliveryTotals {
        aggregate(&self.entries, &self.categories)
    }

    /// Per-entry over-classification findings
    pub fn advisories(&self) -> Vec<EntryAdvisory> {
        advisories(&self.entries, &self.categories)
    }

    /// The save payload for `POST /deliveries`
    pub fn to_save_input(&self, delivery_date: NaiveDate, delivery_time: NaiveTime) -> SaveDeliveryInput {
        SaveDeliveryInput {
            supplier_id: self.supplier_id,
            delivery_date,
            delivery_time,
            entries: self.entries_payload(),
        }
    }

    /// All line-items in wire shape
    pub fn entries_payload(&self) -> Vec<EntryPayload> {
        self.entries
            .iter()
            .map(|e| e.to_payload(&self.categories))
            .collect()
    }

    fn with_entry(&mut self, entry_id: Uuid, edit: impl FnOnce(&mut DraftEntry)) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.id == entry_id) {
            edit(entry);
        }
    }

    /// Whether a rejection target matches the catalog's branching shape
    fn target_in_catalog(&self, target: &RejectionTarget) -> bool {
        let Some(category) = self
            .categories
            .iter()
            .find(|c| c.active && c.id == target.category())
        else {
            return false;
        };
        match target {
            RejectionTarget::Category { .. } => !category.has_active_subcategories(),
            RejectionTarget::Subcategory { subcategory, .. } => category
                .active_subcategories()
                .any(|s| s.id == *subcategory),
        }
    }
}
