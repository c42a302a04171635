//! Two-layer editable numeric fields
//!
//! Every quantity and price in a draft keeps the canonical raw text the
//! operator typed next to the parsed value, so the UI can render in-progress
//! input while arithmetic only ever touches the parsed layer.

use rust_decimal::Decimal;

use crate::normalize::{normalize_count, normalize_price, NormalizeError};

/// An editable stem count: canonical text plus its integer value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountField {
    text: String,
    value: u32,
}

impl CountField {
    /// Parse raw text through the normalizer; `Err` leaves the caller's
    /// previous field untouched
    pub fn parse(raw: &str) -> Result<Self, NormalizeError> {
        let text = normalize_count(raw)?;
        let value = if text.is_empty() {
            0
        } else {
            text.parse().map_err(|_| NormalizeError::NotACount)?
        };
        Ok(Self { text, value })
    }

    /// Seed a field from a persisted value
    pub fn from_value(value: u32) -> Self {
        Self {
            text: value.to_string(),
            value,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    /// Whether the operator has typed anything
    pub fn is_set(&self) -> bool {
        !self.text.is_empty()
    }
}

/// An editable unit price: canonical text plus its exact decimal value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriceField {
    text: String,
    value: Decimal,
}

impl PriceField {
    pub fn parse(raw: &str) -> Result<Self, NormalizeError> {
        let text = normalize_price(raw)?;
        let value = parse_price_text(&text).ok_or(NormalizeError::NotAPrice)?;
        Ok(Self { text, value })
    }

    pub fn from_decimal(value: Decimal) -> Self {
        Self {
            text: value.to_string(),
            value,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn value(&self) -> Decimal {
        self.value
    }

    pub fn is_set(&self) -> bool {
        !self.text.is_empty()
    }
}

/// Exact value of canonical price text; partial typing ("", ".", "12.")
/// reads as the amount typed so far. `None` if the whole part overflows.
fn parse_price_text(text: &str) -> Option<Decimal> {
    let (whole, frac) = match text.split_once('.') {
        Some((w, f)) => (w, f),
        None => (text, ""),
    };
    let mut value = if whole.is_empty() {
        Decimal::ZERO
    } else {
        whole.parse::<i64>().map(Decimal::from).ok()?
    };
    if !frac.is_empty() {
        let cents = frac.parse::<i64>().ok()?;
        value += Decimal::new(cents, frac.len() as u32);
    }
    Some(value)
}
