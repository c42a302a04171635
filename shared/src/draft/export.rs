//! Export classification ledger
//!
//! Per line-item store of stem quantities and unit prices keyed by the fixed
//! size-bucket set. Money math is exact decimal throughout.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use super::fields::{CountField, PriceField};
use crate::models::SizeKey;
use crate::normalize::NormalizeError;

/// One size bucket: stem count and unit price
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportBucket {
    pub quantity: CountField,
    pub price: PriceField,
}

/// All export buckets of one entry, every size key always present
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportLedger {
    buckets: BTreeMap<SizeKey, ExportBucket>,
}

impl ExportLedger {
    pub fn new() -> Self {
        Self {
            buckets: SizeKey::ALL
                .iter()
                .map(|key| (*key, ExportBucket::default()))
                .collect(),
        }
    }

    pub fn bucket(&self, key: SizeKey) -> &ExportBucket {
        // every key is inserted at construction
        &self.buckets[&key]
    }

    /// Set a bucket quantity from raw text; invalid input is a no-op error
    /// and the prior value stays
    pub fn set_quantity(&mut self, key: SizeKey, raw: &str) -> Result<(), NormalizeError> {
        let field = CountField::parse(raw)?;
        if let Some(bucket) = self.buckets.get_mut(&key) {
            bucket.quantity = field;
        }
        Ok(())
    }

    /// Set a bucket unit price from raw text; invalid input is a no-op error
    pub fn set_price(&mut self, key: SizeKey, raw: &str) -> Result<(), NormalizeError> {
        let field = PriceField::parse(raw)?;
        if let Some(bucket) = self.buckets.get_mut(&key) {
            bucket.price = field;
        }
        Ok(())
    }

    /// Total exportable stems across all size buckets
    pub fn stem_total(&self) -> u32 {
        self.buckets.values().map(|b| b.quantity.value()).sum()
    }

    /// Exact quantity×price sum across all size buckets
    pub fn monetary_total(&self) -> Decimal {
        self.buckets
            .values()
            .map(|b| Decimal::from(b.quantity.value()) * b.price.value())
            .sum()
    }

    /// Non-zero quantities in wire shape
    pub fn quantities(&self) -> BTreeMap<SizeKey, u32> {
        self.buckets
            .iter()
            .filter(|(_, b)| b.quantity.value() > 0)
            .map(|(key, b)| (*key, b.quantity.value()))
            .collect()
    }

    /// Unit prices for buckets that carry stems, in wire shape
    pub fn prices(&self) -> BTreeMap<SizeKey, Decimal> {
        self.buckets
            .iter()
            .filter(|(_, b)| b.quantity.value() > 0)
            .map(|(key, b)| (*key, b.price.value()))
            .collect()
    }

    /// Seed from persisted wire maps when editing an existing delivery
    pub fn from_maps(
        quantities: &BTreeMap<SizeKey, u32>,
        prices: &BTreeMap<SizeKey, Decimal>,
    ) -> Self {
        let mut ledger = Self::new();
        for (key, bucket) in ledger.buckets.iter_mut() {
            if let Some(quantity) = quantities.get(key) {
                bucket.quantity = CountField::from_value(*quantity);
            }
            if let Some(price) = prices.get(key) {
                bucket.price = PriceField::from_decimal(*price);
            }
        }
        ledger
    }
}

impl Default for ExportLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn totals_sum_over_all_buckets() {
        let mut ledger = ExportLedger::new();
        ledger.set_quantity(SizeKey::Cm40, "100").unwrap();
        ledger.set_price(SizeKey::Cm40, "0.30").unwrap();
        ledger.set_quantity(SizeKey::Cm60, "150").unwrap();
        ledger.set_price(SizeKey::Cm60, "0.45").unwrap();

        assert_eq!(ledger.stem_total(), 250);
        assert_eq!(ledger.monetary_total(), dec("97.50"));
    }

    #[test]
    fn invalid_input_keeps_prior_value() {
        let mut ledger = ExportLedger::new();
        ledger.set_quantity(SizeKey::Cm50, "80").unwrap();
        assert!(ledger.set_quantity(SizeKey::Cm50, "8x").is_err());
        assert_eq!(ledger.bucket(SizeKey::Cm50).quantity.value(), 80);
    }

    #[test]
    fn wire_maps_skip_empty_buckets() {
        let mut ledger = ExportLedger::new();
        ledger.set_quantity(SizeKey::Cm70, "40").unwrap();
        ledger.set_price(SizeKey::Cm80, "0.55").unwrap(); // price without stems

        let quantities = ledger.quantities();
        assert_eq!(quantities.len(), 1);
        assert_eq!(quantities[&SizeKey::Cm70], 40);
        assert!(!ledger.prices().contains_key(&SizeKey::Cm80));
    }
}
