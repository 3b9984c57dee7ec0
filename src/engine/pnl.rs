use crate::domain::{DebtSnapshot, Decimal, PnlRecord};

use super::AggregateError;

/// Computes the derived PnL columns for one joined snapshot row.
pub struct PnlDeriver;

impl PnlDeriver {
    /// `net_pnl = market_debt - net_transfers - fees_paid`, `staker_pnl = -net_pnl`.
    pub fn derive(
        snapshot: &DebtSnapshot,
        net_transfers: Decimal,
        fees_paid: Decimal,
    ) -> Result<PnlRecord, AggregateError> {
        let net_pnl = snapshot
            .market_debt
            .checked_sub(net_transfers)
            .and_then(|d| d.checked_sub(fees_paid))
            .ok_or_else(|| AggregateError::Overflow {
                asset: snapshot.asset.clone(),
                timestamp: snapshot.timestamp,
                column: "net_pnl",
            })?;
        Ok(PnlRecord {
            asset: snapshot.asset.clone(),
            timestamp: snapshot.timestamp,
            market_debt: snapshot.market_debt,
            net_transfers,
            fees_paid,
            date: snapshot.timestamp.to_datetime(),
            net_pnl,
            staker_pnl: -net_pnl,
        })
    }
}
