//! Raw event records read from the data source.
//!
//! All three are append-only, keyed by asset and ordered by timestamp within an asset.

use crate::domain::{Asset, Decimal, Timestamp};

/// A single executed trade and the fee it paid (`fee_paid >= 0`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trade {
    pub asset: Asset,
    pub timestamp: Timestamp,
    pub fee_paid: Decimal,
}

/// Net deposit (positive) or withdrawal (negative) of margin for a market.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transfer {
    pub asset: Asset,
    pub timestamp: Timestamp,
    pub size: Decimal,
}

/// The market's accounted debt at an instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebtSnapshot {
    pub asset: Asset,
    pub timestamp: Timestamp,
    pub market_debt: Decimal,
}

impl Trade {
    pub fn new(asset: Asset, timestamp: Timestamp, fee_paid: Decimal) -> Self {
        Self {
            asset,
            timestamp,
            fee_paid,
        }
    }
}

impl Transfer {
    pub fn new(asset: Asset, timestamp: Timestamp, size: Decimal) -> Self {
        Self {
            asset,
            timestamp,
            size,
        }
    }
}

impl DebtSnapshot {
    pub fn new(asset: Asset, timestamp: Timestamp, market_debt: Decimal) -> Self {
        Self {
            asset,
            timestamp,
            market_debt,
        }
    }
}

/// A per-asset event carrying one numeric measure that can be accumulated.
pub trait SeriesEvent {
    fn asset(&self) -> &Asset;
    fn timestamp(&self) -> Timestamp;
    fn measure(&self) -> Decimal;
}

impl SeriesEvent for Trade {
    fn asset(&self) -> &Asset {
        &self.asset
    }

    fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    fn measure(&self) -> Decimal {
        self.fee_paid
    }
}

impl SeriesEvent for Transfer {
    fn asset(&self) -> &Asset {
        &self.asset
    }

    fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    fn measure(&self) -> Decimal {
        self.size
    }
}
