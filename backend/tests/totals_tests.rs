//! Totals aggregation tests
//!
//! Verifies the delivery-wide fold and its advisory over-classification
//! findings

use rust_decimal::Decimal;
use uuid::Uuid;

use shared::{
    aggregate, Category, DeliveryDraft, DeliveryTotals, DraftAction, RejectionTarget, SizeKey,
};

/// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn leaf_category(id: Uuid) -> Category {
    Category {
        id,
        name: "Flor local".to_string(),
        active: true,
        subcategories: Vec::new(),
    }
}

// ============================================================================
// Empty Aggregation
// ============================================================================

#[test]
fn zero_entries_aggregate_to_all_zeros() {
    let totals = aggregate(&[], &[]);
    assert_eq!(
        totals,
        DeliveryTotals {
            quantity: 0,
            exportable: 0,
            local: 0,
            classified: 0,
            remaining: 0,
            progress: 0,
        }
    );
}

// ============================================================================
// Reference Scenario
// ============================================================================
// Entry with quantity 500, export buckets cm_40:100 @ 0.30 and cm_60:150 @
// 0.45, and a 50-stem category-level rejection.

#[test]
fn reference_scenario_totals() {
    let cat = Uuid::new_v4();
    let draft = DeliveryDraft::new(Uuid::new_v4(), vec![leaf_category(cat)]);
    let draft = draft.apply(DraftAction::AddEntry {
        species_name: "Rosa".to_string(),
        variety_name: "Freedom".to_string(),
    });
    let entry_id = draft.entries()[0].id;

    let draft = draft
        .apply(DraftAction::SetReceivedQuantity {
            entry_id,
            raw: "500".to_string(),
        })
        .apply(DraftAction::SetBucketQuantity {
            entry_id,
            size: SizeKey::Cm40,
            raw: "100".to_string(),
        })
        .apply(DraftAction::SetBucketPrice {
            entry_id,
            size: SizeKey::Cm40,
            raw: "0.30".to_string(),
        })
        .apply(DraftAction::SetBucketQuantity {
            entry_id,
            size: SizeKey::Cm60,
            raw: "150".to_string(),
        })
        .apply(DraftAction::SetBucketPrice {
            entry_id,
            size: SizeKey::Cm60,
            raw: "0.45".to_string(),
        })
        .apply(DraftAction::SetRejectionQuantity {
            entry_id,
            target: RejectionTarget::Category { category: cat },
            raw: "50".to_string(),
        });

    let totals = draft.totals();
    assert_eq!(totals.quantity, 500);
    assert_eq!(totals.exportable, 250);
    assert_eq!(totals.local, 50);
    assert_eq!(totals.classified, 300);
    assert_eq!(totals.remaining, 200);
    assert_eq!(totals.progress, 60);

    assert_eq!(draft.entries()[0].monetary_total(), dec("97.50"));
    assert!(draft.advisories().is_empty());

    // the save payload carries the same numbers
    let payload = &draft.entries_payload()[0];
    assert_eq!(payload.quantity, 500);
    assert_eq!(payload.exportable[&SizeKey::Cm40], 100);
    assert_eq!(payload.prices[&SizeKey::Cm60], dec("0.45"));
    assert_eq!(payload.total_price, dec("97.50"));
}

// ============================================================================
// Over-Classification Is Advisory
// ============================================================================
// remaining < 0 and progress > 100 are reported, never blocked.

#[test]
fn over_classification_is_reported_not_blocked() {
    let draft = DeliveryDraft::new(Uuid::new_v4(), Vec::new());
    let draft = draft.apply(DraftAction::AddEntry {
        species_name: "Rosa".to_string(),
        variety_name: "Freedom".to_string(),
    });
    let entry_id = draft.entries()[0].id;

    let draft = draft
        .apply(DraftAction::SetReceivedQuantity {
            entry_id,
            raw: "200".to_string(),
        })
        .apply(DraftAction::SetBucketQuantity {
            entry_id,
            size: SizeKey::Cm80,
            raw: "300".to_string(),
        });

    let totals = draft.totals();
    assert_eq!(totals.remaining, -100);
    assert_eq!(totals.progress, 150);

    let advisories = draft.advisories();
    assert_eq!(advisories.len(), 1);
    assert_eq!(advisories[0].remaining, -100);
    assert_eq!(advisories[0].progress, 150);

    // the payload still serializes; saving stays possible
    assert_eq!(draft.entries_payload()[0].remaining(), -100);
}

#[test]
fn zero_quantity_with_classification_reads_as_zero_progress() {
    let draft = DeliveryDraft::new(Uuid::new_v4(), Vec::new());
    let draft = draft.apply(DraftAction::AddEntry {
        species_name: "Rosa".to_string(),
        variety_name: "Freedom".to_string(),
    });
    let entry_id = draft.entries()[0].id;

    let draft = draft.apply(DraftAction::SetBucketQuantity {
        entry_id,
        size: SizeKey::Cm40,
        raw: "10".to_string(),
    });

    let totals = draft.totals();
    assert_eq!(totals.quantity, 0);
    assert_eq!(totals.classified, 10);
    assert_eq!(totals.remaining, -10);
    // progress is defined as 0 when nothing was received
    assert_eq!(totals.progress, 0);
    assert_eq!(draft.advisories().len(), 1);
}

// ============================================================================
// Multi-Entry Folds
// ============================================================================

#[test]
fn totals_fold_across_entries() {
    let draft = DeliveryDraft::new(Uuid::new_v4(), Vec::new());
    let draft = draft
        .apply(DraftAction::AddEntry {
            species_name: "Rosa".to_string(),
            variety_name: "Freedom".to_string(),
        })
        .apply(DraftAction::AddEntry {
            species_name: "Rosa".to_string(),
            variety_name: "Vendela".to_string(),
        });
    let first = draft.entries()[0].id;
    let second = draft.entries()[1].id;

    let draft = draft
        .apply(DraftAction::SetReceivedQuantity {
            entry_id: first,
            raw: "300".to_string(),
        })
        .apply(DraftAction::SetBucketQuantity {
            entry_id: first,
            size: SizeKey::Cm50,
            raw: "120".to_string(),
        })
        .apply(DraftAction::SetReceivedQuantity {
            entry_id: second,
            raw: "200".to_string(),
        })
        .apply(DraftAction::SetBucketQuantity {
            entry_id: second,
            size: SizeKey::Cm70,
            raw: "80".to_string(),
        });

    let totals = draft.totals();
    assert_eq!(totals.quantity, 500);
    assert_eq!(totals.exportable, 200);
    assert_eq!(totals.classified, 200);
    assert_eq!(totals.remaining, 300);
    assert_eq!(totals.progress, 40);
}
