use crate::datasource::{DataSource, DataSourceError};
use crate::engine::{AggregateError, Aggregator, PnlTable};
use crate::export::{self, ExportError};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum RefreshError {
    #[error(transparent)]
    DataSource(#[from] DataSourceError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    Aggregate(#[from] AggregateError),
    #[error("aggregation task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Produces a complete PnL table for one refresh cycle.
#[async_trait]
pub trait PnlLoader: Send + Sync {
    async fn load(&self) -> Result<PnlTable, RefreshError>;

    /// Short label for logs.
    fn describe(&self) -> String;
}

/// Fetches raw events from a data source and aggregates them.
pub struct LiveLoader {
    datasource: Arc<dyn DataSource>,
}

impl LiveLoader {
    pub fn new(datasource: Arc<dyn DataSource>) -> Self {
        Self { datasource }
    }
}

#[async_trait]
impl PnlLoader for LiveLoader {
    async fn load(&self) -> Result<PnlTable, RefreshError> {
        let started = Instant::now();
        let (trades, transfers, debt) = futures::try_join!(
            self.datasource.fetch_trades(),
            self.datasource.fetch_transfers(),
            self.datasource.fetch_debt_snapshots(),
        )?;

        info!(
            trades = trades.len(),
            transfers = transfers.len(),
            debt_snapshots = debt.len(),
            "Fetched raw events"
        );

        let table = tokio::task::spawn_blocking(move || {
            Aggregator::aggregate(&trades, &transfers, &debt)
        })
        .await??;

        info!(
            records = table.len(),
            assets = table.assets().len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Aggregated PnL table"
        );
        Ok(table)
    }

    fn describe(&self) -> String {
        format!("live({:?})", self.datasource)
    }
}

/// Reads a previously exported PnL CSV.
pub struct CsvLoader {
    path: PathBuf,
}

impl CsvLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl PnlLoader for CsvLoader {
    async fn load(&self) -> Result<PnlTable, RefreshError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(ExportError::from)?;
        let table = export::read_csv(bytes.as_slice())?;
        info!(
            path = %self.path.display(),
            records = table.len(),
            "Loaded PnL table from csv"
        );
        Ok(table)
    }

    fn describe(&self) -> String {
        format!("csv({})", self.path.display())
    }
}
