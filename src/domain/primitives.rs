//! Domain primitives: Asset, Timestamp.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Perps market identifier (e.g., "sETH", "sBTC").
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Asset(pub String);

impl Asset {
    /// Create an Asset from a string.
    pub fn new(asset: impl Into<String>) -> Self {
        Asset(asset.into())
    }

    /// Get the asset as a string reference.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Asset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("timestamp {0} is outside the representable date range")]
pub struct TimestampError(pub i64);

/// Event time in whole seconds since the Unix epoch.
///
/// Construction checks that the value maps onto a calendar instant, so every
/// `Timestamp` can be rendered as a date without a fallible conversion later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create a Timestamp from epoch seconds.
    pub fn from_secs(secs: i64) -> Result<Self, TimestampError> {
        DateTime::<Utc>::from_timestamp(secs, 0)
            .map(Timestamp)
            .ok_or(TimestampError(secs))
    }

    /// Get the epoch seconds value.
    pub fn as_secs(&self) -> i64 {
        self.0.timestamp()
    }

    /// The UTC instant this timestamp denotes.
    pub fn to_datetime(&self) -> DateTime<Utc> {
        self.0
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_secs())
    }
}
