//! Derived PnL row.

use crate::domain::{Asset, Decimal, Timestamp};
use chrono::{DateTime, Utc};

/// Display format for the `date` column, matching the dashboard export.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One row of the PnL table: a debt snapshot joined with the cumulative
/// transfers and fees known at that instant.
///
/// `net_pnl = market_debt - net_transfers - fees_paid` and
/// `staker_pnl = -net_pnl` hold for every record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PnlRecord {
    pub asset: Asset,
    pub timestamp: Timestamp,
    pub market_debt: Decimal,
    pub net_transfers: Decimal,
    pub fees_paid: Decimal,
    pub date: DateTime<Utc>,
    pub net_pnl: Decimal,
    pub staker_pnl: Decimal,
}

impl PnlRecord {
    /// The `date` column rendered as `YYYY-MM-DD HH:MM:SS` (UTC).
    pub fn date_string(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }
}
