//! Data source abstraction for fetching the raw trade, transfer and debt record sets.

use crate::domain::{DebtSnapshot, Trade, Transfer};
use async_trait::async_trait;
use std::fmt;

pub mod mock;
pub mod sqlite;

pub use mock::MockDataSource;
pub use sqlite::SqliteDataSource;

/// Source of the three raw record sets consumed by the aggregator.
///
/// Implementations own connection handling and any retry policy. Rows must be
/// well-typed on return: malformed rows are reported as
/// [`DataSourceError::Malformed`] instead of being skipped. Sort order is not
/// required.
#[async_trait]
pub trait DataSource: Send + Sync + fmt::Debug {
    /// Fetch every trade (asset, timestamp, fee paid).
    async fn fetch_trades(&self) -> Result<Vec<Trade>, DataSourceError>;

    /// Fetch every margin transfer (asset, timestamp, signed size).
    async fn fetch_transfers(&self) -> Result<Vec<Transfer>, DataSourceError>;

    /// Fetch every market debt snapshot (asset, timestamp, debt).
    async fn fetch_debt_snapshots(&self) -> Result<Vec<DebtSnapshot>, DataSourceError>;
}

/// Error type for data source operations.
#[derive(Debug, Clone)]
pub enum DataSourceError {
    /// Storage or connection failure
    Database(String),
    /// Row failed data-integrity checks (bad timestamp, non-numeric measure)
    Malformed { table: String, reason: String },
    /// Connection handle already closed
    Closed,
    /// Other error
    Other(String),
}

impl fmt::Display for DataSourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSourceError::Database(msg) => write!(f, "Database error: {}", msg),
            DataSourceError::Malformed { table, reason } => {
                write!(f, "Malformed record in {}: {}", table, reason)
            }
            DataSourceError::Closed => write!(f, "Data source closed"),
            DataSourceError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for DataSourceError {}
