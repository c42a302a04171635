//! Delivery-wide totals
//!
//! Folded from scratch over every entry on every recompute; there are no
//! incremental counters to drift. Cardinality is tens of entries with ten
//! buckets each, so correctness wins over speed.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::DraftEntry;
use crate::models::{Category, EntryPayload};

/// Reconciliation summary for a whole delivery draft
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryTotals {
    /// Sum of received quantities
    pub quantity: u32,
    /// Stems classified into export size buckets
    pub exportable: u32,
    /// Stems rejected to the local market
    pub local: u32,
    /// `exportable + local`
    pub classified: u32,
    /// `quantity - classified`; negative signals over-classification
    pub remaining: i64,
    /// `round(classified / quantity * 100)`; may exceed 100
    pub progress: u32,
}

/// Advisory finding for one over-classified entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryAdvisory {
    pub entry_id: Uuid,
    pub species_name: String,
    pub variety_name: String,
    pub remaining: i64,
    pub progress: u32,
}

/// Fold all entries into delivery-wide totals
pub fn aggregate(entries: &[DraftEntry], categories: &[Category]) -> DeliveryTotals {
    let mut quantity: u64 = 0;
    let mut exportable: u64 = 0;
    let mut local: u64 = 0;

    for entry in entries {
        quantity += u64::from(entry.received_quantity());
        exportable += u64::from(entry.export.stem_total());
        local += u64::from(entry.local_total(categories));
    }

    let classified = exportable + local;
    DeliveryTotals {
        quantity: clamp_u32(quantity),
        exportable: clamp_u32(exportable),
        local: clamp_u32(local),
        classified: clamp_u32(classified),
        remaining: quantity as i64 - classified as i64,
        progress: progress_percent(classified, quantity),
    }
}

/// Fold wire-shape entries into the same totals; used where only the
/// persisted payload is at hand (save responses, browser-side recompute)
pub fn aggregate_payloads(entries: &[EntryPayload]) -> DeliveryTotals {
    let mut quantity: u64 = 0;
    let mut exportable: u64 = 0;
    let mut local: u64 = 0;

    for entry in entries {
        quantity += u64::from(entry.quantity);
        exportable += u64::from(entry.exportable_total());
        local += u64::from(entry.local_total());
    }

    let classified = exportable + local;
    DeliveryTotals {
        quantity: clamp_u32(quantity),
        exportable: clamp_u32(exportable),
        local: clamp_u32(local),
        classified: clamp_u32(classified),
        remaining: quantity as i64 - classified as i64,
        progress: progress_percent(classified, quantity),
    }
}

/// Entries whose classified sum has outrun the received quantity. Advisory
/// only: surfaced on every recompute and in save responses, never blocking.
pub fn advisories(entries: &[DraftEntry], categories: &[Category]) -> Vec<EntryAdvisory> {
    entries
        .iter()
        .filter_map(|entry| {
            let quantity = u64::from(entry.received_quantity());
            let classified =
                u64::from(entry.export.stem_total()) + u64::from(entry.local_total(categories));
            let remaining = quantity as i64 - classified as i64;
            let progress = progress_percent(classified, quantity);
            if remaining < 0 || progress > 100 {
                Some(EntryAdvisory {
                    entry_id: entry.id,
                    species_name: entry.species_name.clone(),
                    variety_name: entry.variety_name.clone(),
                    remaining,
                    progress,
                })
            } else {
                None
            }
        })
        .collect()
}

/// Rounded percentage with half-up midpoints; zero quantity reads as 0
pub(crate) fn progress_percent(classified: u64, quantity: u64) -> u32 {
    if quantity == 0 {
        return 0;
    }
    let ratio = Decimal::from(classified) * Decimal::from(100u32) / Decimal::from(quantity);
    ratio
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u32()
        .unwrap_or(0)
}

fn clamp_u32(value: u64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_rounds_half_up() {
        assert_eq!(progress_percent(1, 3), 33);
        assert_eq!(progress_percent(1, 2), 50);
        assert_eq!(progress_percent(5, 8), 63);
        assert_eq!(progress_percent(0, 0), 0);
    }

    #[test]
    fn progress_can_exceed_one_hundred() {
        assert_eq!(progress_percent(300, 200), 150);
    }
}
