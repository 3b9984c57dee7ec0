use thiserror::Error;

use crate::domain::{Asset, Timestamp};

/// Aggregation failure. Inputs are well-typed by then, so the only way to fail
/// is an amount leaving the representable decimal range.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AggregateError {
    #[error("{column} overflowed for {asset} at {timestamp}")]
    Overflow {
        asset: Asset,
        timestamp: Timestamp,
        column: &'static str,
    },
    #[error("total {column} overflowed at {date}")]
    TotalOverflow { date: String, column: &'static str },
}
