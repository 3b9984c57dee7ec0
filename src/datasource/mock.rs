//! Mock data source for testing without a database.

use super::{DataSource, DataSourceError};
use crate::domain::{DebtSnapshot, Trade, Transfer};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Mock data source that returns predefined test data.
///
/// Clones share the same fetch counter and failure switch, so a test can keep
/// a handle after moving the source into a service.
#[derive(Debug, Clone, Default)]
pub struct MockDataSource {
    trades: Vec<Trade>,
    transfers: Vec<Transfer>,
    debt: Vec<DebtSnapshot>,
    failure: Arc<Mutex<Option<DataSourceError>>>,
    fetches: Arc<AtomicUsize>,
}

impl MockDataSource {
    /// Create a new mock data source with empty data.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add trades to the mock data source.
    pub fn with_trades(mut self, trades: Vec<Trade>) -> Self {
        self.trades.extend(trades);
        self
    }

    /// Add transfers to the mock data source.
    pub fn with_transfers(mut self, transfers: Vec<Transfer>) -> Self {
        self.transfers.extend(transfers);
        self
    }

    /// Add debt snapshots to the mock data source.
    pub fn with_debt_snapshots(mut self, debt: Vec<DebtSnapshot>) -> Self {
        self.debt.extend(debt);
        self
    }

    /// Make every subsequent debt snapshot fetch fail with `error` (`None` clears it).
    pub fn set_failure(&self, error: Option<DataSourceError>) {
        if let Ok(mut slot) = self.failure.lock() {
            *slot = error;
        }
    }

    /// Number of debt snapshot fetches served so far, one per refresh.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DataSource for MockDataSource {
    async fn fetch_trades(&self) -> Result<Vec<Trade>, DataSourceError> {
        Ok(self.trades.clone())
    }

    async fn fetch_transfers(&self) -> Result<Vec<Transfer>, DataSourceError> {
        Ok(self.transfers.clone())
    }

    async fn fetch_debt_snapshots(&self) -> Result<Vec<DebtSnapshot>, DataSourceError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let failure = self
            .failure
            .lock()
            .map_err(|e| DataSourceError::Other(e.to_string()))?
            .clone();
        match failure {
            Some(err) => Err(err),
            None => Ok(self.debt.clone()),
        }
    }
}
