//! Received-quantity reconciliation
//!
//! New entries carry a directly-typed quantity. Entries loaded from a saved
//! delivery keep their persisted quantity immutable and track edits as
//! independent add/remove deltas, so the original value survives for audit.

use super::fields::CountField;

/// How an entry's received quantity is determined
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuantitySource {
    /// New entry: the operator types the quantity
    Direct(CountField),
    /// Existing entry: `received = max(0, original + added - removed)`
    Delta {
        original: u32,
        added: CountField,
        removed: CountField,
    },
}

impl QuantitySource {
    pub fn new_direct() -> Self {
        QuantitySource::Direct(CountField::default())
    }

    pub fn for_existing(original: u32) -> Self {
        QuantitySource::Delta {
            original,
            added: CountField::default(),
            removed: CountField::default(),
        }
    }

    /// The effective received quantity, floored at zero
    pub fn received(&self) -> u32 {
        match self {
            QuantitySource::Direct(field) => field.value(),
            QuantitySource::Delta {
                original,
                added,
                removed,
            } => {
                let gross = u64::from(*original) + u64::from(added.value());
                let net = gross.saturating_sub(u64::from(removed.value()));
                u32::try_from(net).unwrap_or(u32::MAX)
            }
        }
    }

    /// The persisted value a delta tracks against, if any
    pub fn original(&self) -> Option<u32> {
        match self {
            QuantitySource::Direct(_) => None,
            QuantitySource::Delta { original, .. } => Some(*original),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direct_quantity_tracks_typed_value() {
        let mut source = QuantitySource::new_direct();
        assert_eq!(source.received(), 0);
        if let QuantitySource::Direct(field) = &mut source {
            *field = CountField::parse("500").unwrap();
        }
        assert_eq!(source.received(), 500);
    }

    #[test]
    fn delta_adds_and_removes_independently() {
        let source = QuantitySource::Delta {
            original: 100,
            added: CountField::parse("20").unwrap(),
            removed: CountField::parse("5").unwrap(),
        };
        assert_eq!(source.received(), 115);
        assert_eq!(source.original(), Some(100));
    }

    #[test]
    fn delta_floors_at_zero() {
        let source = QuantitySource::Delta {
            original: 100,
            added: CountField::parse("20").unwrap(),
            removed: CountField::parse("130").unwrap(),
        };
        assert_eq!(source.received(), 0);
    }
}
