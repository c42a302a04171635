//! Free-text numeric input normalization
//!
//! Quantities and prices arrive from the intake UI as raw text. These
//! functions canonicalize that text before a draft stores it; when
//! normalization fails the caller keeps the previous value.

use thiserror::Error;

/// Rejection reasons for raw numeric text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NormalizeError {
    #[error("not a whole number")]
    NotACount,

    #[error("not a price")]
    NotAPrice,
}

/// Canonicalize a stem-count string.
///
/// Empty input is accepted as "unset". Leading zeros are stripped, keeping a
/// lone "0". Anything that is not all ASCII digits is rejected. Idempotent:
/// `normalize_count(normalize_count(x)) == normalize_count(x)`.
pub fn normalize_count(raw: &str) -> Result<String, NormalizeError> {
    if raw.is_empty() {
        return Ok(String::new());
    }
    if !raw.chars().all(|c| c.is_ascii_digit()) {
        return Err(NormalizeError::NotACount);
    }
    let stripped = raw.trim_start_matches('0');
    if stripped.is_empty() {
        Ok("0".to_string())
    } else {
        Ok(stripped.to_string())
    }
}

/// Canonicalize a unit-price string.
///
/// All characters outside `[0-9.]` are stripped first, then the remainder
/// must be digits with at most one decimal point and at most two fractional
/// digits. Idempotent like [`normalize_count`].
pub fn normalize_price(raw: &str) -> Result<String, NormalizeError> {
    let cleaned: String = raw.chars().filter(|c| c.is_ascii_digit() || *c == '.').collect();
    if !is_valid_price(&cleaned) {
        return Err(NormalizeError::NotAPrice);
    }
    Ok(cleaned)
}

/// Check `^\d*\.?\d{0,2}$` without pulling in a regex engine
fn is_valid_price(s: &str) -> bool {
    match s.split_once('.') {
        None => s.chars().all(|c| c.is_ascii_digit()),
        Some((whole, frac)) => {
            whole.chars().all(|c| c.is_ascii_digit())
                && frac.len() <= 2
                && frac.chars().all(|c| c.is_ascii_digit())
                && !frac.contains('.')
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_accepts_empty_as_unset() {
        assert_eq!(normalize_count(""), Ok(String::new()));
    }

    #[test]
    fn count_strips_leading_zeros() {
        assert_eq!(normalize_count("007"), Ok("7".to_string()));
        assert_eq!(normalize_count("0500"), Ok("500".to_string()));
    }

    #[test]
    fn count_keeps_lone_zero() {
        assert_eq!(normalize_count("0"), Ok("0".to_string()));
        assert_eq!(normalize_count("0000"), Ok("0".to_string()));
    }

    #[test]
    fn count_rejects_non_digits() {
        assert!(normalize_count("12a").is_err());
        assert!(normalize_count("-5").is_err());
        assert!(normalize_count("1.5").is_err());
        assert!(normalize_count(" 12").is_err());
    }

    #[test]
    fn count_is_idempotent() {
        for raw in ["", "0", "007", "500", "120"] {
            let once = normalize_count(raw).unwrap();
            assert_eq!(normalize_count(&once).unwrap(), once);
        }
    }

    #[test]
    fn price_strips_foreign_characters() {
        assert_eq!(normalize_price("$1.50"), Ok("1.50".to_string()));
        assert_eq!(normalize_price(" 0.3 "), Ok("0.3".to_string()));
    }

    #[test]
    fn price_accepts_partial_typing() {
        assert_eq!(normalize_price(""), Ok(String::new()));
        assert_eq!(normalize_price("."), Ok(".".to_string()));
        assert_eq!(normalize_price("12."), Ok("12.".to_string()));
        assert_eq!(normalize_price(".5"), Ok(".5".to_string()));
    }

    #[test]
    fn price_rejects_three_decimals_and_double_dots() {
        assert!(normalize_price("1.234").is_err());
        assert!(normalize_price("1.2.3").is_err());
    }

    #[test]
    fn price_is_idempotent() {
        for raw in ["", ".", "0.30", "12.", "97.50", "5"] {
            let once = normalize_price(raw).unwrap();
            assert_eq!(normalize_price(&once).unwrap(), once);
        }
    }
}
