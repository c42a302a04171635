//! WebAssembly module for the Flower Delivery Management Platform
//!
//! Provides client-side computation for:
//! - Numeric input normalization
//! - Per-entry bucket and monetary totals
//! - Delivery-wide reconciliation totals
//! - Offline supplier form validation

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::normalize::*;
pub use shared::validation::*;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    // Set up panic hook for better error messages in browser console
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Canonicalize a stem-count string; `None` means keep the previous value
#[wasm_bindgen]
pub fn normalize_count_input(raw: &str) -> Option<String> {
    shared::normalize_count(raw).ok()
}

/// Canonicalize a unit-price string; `None` means keep the previous value
#[wasm_bindgen]
pub fn normalize_price_input(raw: &str) -> Option<String> {
    shared::normalize_price(raw).ok()
}

/// Effective received quantity of an existing entry after delta edits
#[wasm_bindgen]
pub fn received_after_delta(original: u32, added: u32, removed: u32) -> u32 {
    let gross = u64::from(original) + u64::from(added);
    u32::try_from(gross.saturating_sub(u64::from(removed))).unwrap_or(u32::MAX)
}

/// Sum a `{size_key: quantity}` map of export buckets
#[wasm_bindgen]
pub fn bucket_total(quantities_json: &str) -> Result<u32, JsValue> {
    let quantities: BTreeMap<SizeKey, u32> = serde_json::from_str(quantities_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid quantities JSON: {}", e)))?;
    Ok(quantities.values().sum())
}

/// Exact quantity×price total over export buckets, as a decimal string
#[wasm_bindgen]
pub fn monetary_total(quantities_json: &str, prices_json: &str) -> Result<String, JsValue> {
    let quantities: BTreeMap<SizeKey, u32> = serde_json::from_str(quantities_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid quantities JSON: {}", e)))?;
    let prices: BTreeMap<SizeKey, Decimal> = serde_json::from_str(prices_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid prices JSON: {}", e)))?;

    let total: Decimal = quantities
        .iter()
        .map(|(key, quantity)| {
            Decimal::from(*quantity) * prices.get(key).copied().unwrap_or(Decimal::ZERO)
        })
        .sum();
    Ok(total.to_string())
}

/// Delivery-wide reconciliation totals from wire-shape entries
#[wasm_bindgen]
pub fn aggregate_delivery(entries_json: &str) -> Result<String, JsValue> {
    let entries: Vec<EntryPayload> = serde_json::from_str(entries_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid entries JSON: {}", e)))?;

    let totals = shared::aggregate_payloads(&entries);
    serde_json::to_string(&totals).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Validate the quick-supplier form; returns a `{field: message}` JSON map,
/// empty when the form is valid
#[wasm_bindgen]
pub fn validate_supplier_form(input_json: &str) -> Result<String, JsValue> {
    let input: QuickSupplierInput = serde_json::from_str(input_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid input JSON: {}", e)))?;

    let errors = shared::validate_quick_supplier(&input);
    serde_json::to_string(&errors).map_err(|e| JsValue::from_str(&e.to_string()))
}
