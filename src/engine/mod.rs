//! Pure PnL aggregation over an immutable snapshot of trades, transfers and debt.
//!
//! The pipeline is: running totals per asset (`CumulativeSeriesBuilder`), a
//! backward as-of join onto the debt timeline (`AsOfJoiner`), then the derived
//! PnL columns (`PnlDeriver`). `Aggregator::aggregate` runs all three.

use crate::domain::{DebtSnapshot, Trade, Transfer};

pub mod asof;
pub mod cumulative;
mod error;
pub mod pnl;
pub mod table;

pub use asof::AsOfJoiner;
pub use cumulative::{CumulativeSeries, CumulativeSeriesBuilder, RunningTotal};
pub use error::AggregateError;
pub use pnl::PnlDeriver;
pub use table::{PnlTable, PnlTotal, SelectionError};

/// Stateless entry point for one full recomputation.
pub struct Aggregator;

impl Aggregator {
    /// Compute the PnL table. Inputs need not be sorted.
    ///
    /// One record is produced per debt snapshot; snapshots for assets with no
    /// transfers or trades get zero net transfers and fees.
    ///
    /// # Errors
    /// Returns `AggregateError::Overflow` when a running total or a derived PnL
    /// value leaves the decimal range; no partial table is produced.
    pub fn aggregate(
        trades: &[Trade],
        transfers: &[Transfer],
        debt: &[DebtSnapshot],
    ) -> Result<PnlTable, AggregateError> {
        let transfer_totals = CumulativeSeriesBuilder::build("net_transfers", transfers)?;
        let fee_totals = CumulativeSeriesBuilder::build("fees_paid", trades)?;

        let net_transfers = AsOfJoiner::join(debt, &transfer_totals);
        let fees_paid = AsOfJoiner::join(debt, &fee_totals);

        let records = debt
            .iter()
            .zip(net_transfers)
            .zip(fees_paid)
            .map(|((snapshot, net_transfers), fees_paid)| {
                PnlDeriver::derive(snapshot, net_transfers, fees_paid)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(PnlTable::new(records))
    }
}
