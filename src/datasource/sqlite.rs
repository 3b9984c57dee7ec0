//! SQLite-backed data source reading the `trades`, `transfers` and `market_debt` tables.

use super::{DataSource, DataSourceError};
use crate::db::{RepoError, Repository};
use crate::domain::{DebtSnapshot, Trade, Transfer};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// Data source over the shared repository pool.
pub struct SqliteDataSource {
    repo: Arc<Repository>,
}

impl SqliteDataSource {
    pub fn new(repo: Arc<Repository>) -> Self {
        Self { repo }
    }

    fn check_open(&self) -> Result<(), DataSourceError> {
        if self.repo.is_closed() {
            return Err(DataSourceError::Closed);
        }
        Ok(())
    }
}

impl std::fmt::Debug for SqliteDataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteDataSource").finish_non_exhaustive()
    }
}

impl From<RepoError> for DataSourceError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Db(e) => DataSourceError::Database(e.to_string()),
            RepoError::Malformed {
                table,
                row_id,
                reason,
            } => DataSourceError::Malformed {
                table: table.to_string(),
                reason: format!("row {}: {}", row_id, reason),
            },
        }
    }
}

#[async_trait]
impl DataSource for SqliteDataSource {
    async fn fetch_trades(&self) -> Result<Vec<Trade>, DataSourceError> {
        self.check_open()?;
        let trades = self.repo.query_trades().await?;
        debug!(rows = trades.len(), "Fetched trades");
        Ok(trades)
    }

    async fn fetch_transfers(&self) -> Result<Vec<Transfer>, DataSourceError> {
        self.check_open()?;
        let transfers = self.repo.query_transfers().await?;
        debug!(rows = transfers.len(), "Fetched transfers");
        Ok(transfers)
    }

    async fn fetch_debt_snapshots(&self) -> Result<Vec<DebtSnapshot>, DataSourceError> {
        self.check_open()?;
        let debt = self.repo.query_debt_snapshots().await?;
        debug!(rows = debt.len(), "Fetched debt snapshots");
        Ok(debt)
    }
}
