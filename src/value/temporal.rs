//! Temporal value wrappers.
//!
//! ClickHouse distinguishes `Date` from `Date32` and `DateTime` from `DateTime64`
//! even though they share a calendar representation, so each kind gets its own
//! newtype. `Default` is the Unix epoch for all of them, which is also what the
//! server stores for an unset value.

use chrono::{DateTime as ChronoDateTime, NaiveDate, Utc};
use serde::Serialize;

/// Calendar date stored as `Date` (days since epoch, 16 bit).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct Date(pub NaiveDate);

/// Calendar date stored as `Date32` (extended range).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct Date32(pub NaiveDate);

/// Instant stored as `DateTime` (second resolution).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct DateTime(pub ChronoDateTime<Utc>);

/// Instant stored as `DateTime64` (sub-second resolution set by the column precision).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct DateTime64(pub ChronoDateTime<Utc>);

macro_rules! temporal_conversions {
    ($($wrapper:ident => $inner:ty),* $(,)?) => {$(
        impl From<$inner> for $wrapper {
            fn from(value: $inner) -> Self {
                Self(value)
            }
        }

        impl From<$wrapper> for $inner {
            fn from(value: $wrapper) -> Self {
                value.0
            }
        }
    )*};
}

temporal_conversions! {
    Date => NaiveDate,
    Date32 => NaiveDate,
    DateTime => ChronoDateTime<Utc>,
    DateTime64 => ChronoDateTime<Utc>,
}

impl DateTime {
    /// Seconds since the Unix epoch.
    pub fn timestamp(&self) -> i64 {
        self.0.timestamp()
    }
}

impl DateTime64 {
    /// Milliseconds since the Unix epoch.
    pub fn timestamp_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }
}
