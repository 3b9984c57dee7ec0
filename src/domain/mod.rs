//! Domain types for the perps PnL aggregator.
//!
//! This module provides:
//! - Lossless numeric handling via Decimal wrapper
//! - Domain primitives: Asset, Timestamp
//! - Raw event records (Trade, Transfer, DebtSnapshot) and the derived PnlRecord

pub mod decimal;
pub mod events;
pub mod primitives;
pub mod record;

pub use decimal::Decimal;
pub use events::{DebtSnapshot, SeriesEvent, Trade, Transfer};
pub use primitives::{Asset, Timestamp, TimestampError};
pub use record::{PnlRecord, DATE_FORMAT};
