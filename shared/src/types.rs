//! Common types used across the platform

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Supported languages
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Spanish,
    English,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::Spanish => "es",
            Language::English => "en",
        }
    }
}

/// Calendar-day bucketing policy for duplicate-delivery detection.
///
/// Deliveries are grouped by the local calendar day at the farm, not by UTC
/// day. The offset is an explicit value carried by the resolver and the
/// backend so tests can substitute their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayBoundary {
    offset: FixedOffset,
}

impl DayBoundary {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// Ecuador mainland local time (UTC-5, no daylight saving)
    pub fn ecuador() -> Self {
        Self {
            offset: FixedOffset::west_opt(5 * 3600).expect("fixed offset in range"),
        }
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// The local calendar date an instant falls on
    pub fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.offset).date_naive()
    }

    /// Whether two instants fall on the same local calendar day
    pub fn same_day(&self, a: DateTime<Utc>, b: DateTime<Utc>) -> bool {
        self.local_date(a) == self.local_date(b)
    }

    /// The UTC half-open window `[start, end)` covering a local calendar day
    pub fn utc_window(&self, date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
        let midnight = date
            .and_hms_opt(0, 0, 0)
            .expect("midnight is a valid time")
            .and_local_timezone(self.offset)
            .single()
            .expect("fixed offsets have no ambiguous instants");
        let start = midnight.with_timezone(&Utc);
        (start, start + Duration::days(1))
    }
}

impl Default for DayBoundary {
    fn default() -> Self {
        Self::ecuador()
    }
}
