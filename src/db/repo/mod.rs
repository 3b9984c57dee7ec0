//! Repository layer for database operations.
//!
//! This module provides the `Repository` struct for all database operations.
//! Methods are organized across submodules by domain:
//! - `events.rs` - Trade, transfer and debt snapshot operations

mod events;

use crate::domain::{Asset, Decimal, Timestamp};
use rust_decimal::Decimal as RustDecimal;
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;
use thiserror::Error;

/// Error type for repository reads.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error(transparent)]
    Db(#[from] sqlx::Error),
    /// A stored row could not be converted into a well-typed event.
    #[error("malformed row {row_id} in {table}: {reason}")]
    Malformed {
        table: &'static str,
        row_id: i64,
        reason: String,
    },
}

/// Untyped event row shared by the three event tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct EventRow {
    pub row_id: i64,
    pub asset: Asset,
    pub timestamp: Timestamp,
    pub measure: Decimal,
}

/// Repository for database operations.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Repository { pool }
    }

    /// Close the underlying pool, waiting for checked-out connections to return.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }
}

/// Convert an `(id, asset, timestamp, <measure>)` row into an [`EventRow`].
///
/// Timestamps must be stored as integers and asset ids are trimmed. Measures
/// are normally stored as canonical decimal text; integer and real values
/// written by other tools are accepted too.
pub(crate) fn parse_event_row(
    table: &'static str,
    measure_column: &str,
    row: &SqliteRow,
) -> Result<EventRow, RepoError> {
    let row_id: i64 = row.try_get("id")?;
    let malformed = |reason: String| RepoError::Malformed {
        table,
        row_id,
        reason,
    };

    let asset: String = row
        .try_get("asset")
        .map_err(|e| malformed(format!("invalid asset: {}", e)))?;
    let asset = asset.trim();
    if asset.is_empty() {
        return Err(malformed("empty asset".to_string()));
    }

    let secs: i64 = row
        .try_get("timestamp")
        .map_err(|e| malformed(format!("timestamp is not an integer: {}", e)))?;
    let timestamp = Timestamp::from_secs(secs).map_err(|e| malformed(e.to_string()))?;

    let measure = read_measure(row, measure_column)
        .ok_or_else(|| malformed(format!("{} is not numeric", measure_column)))?;

    Ok(EventRow {
        row_id,
        asset: Asset::new(asset),
        timestamp,
        measure,
    })
}

fn read_measure(row: &SqliteRow, column: &str) -> Option<Decimal> {
    if let Ok(text) = row.try_get::<String, _>(column) {
        return Decimal::from_str_canonical(&text).ok();
    }
    if let Ok(int) = row.try_get::<i64, _>(column) {
        return Some(Decimal::from(int));
    }
    row.try_get::<f64, _>(column)
        .ok()
        .and_then(|real| RustDecimal::try_from(real).ok())
        .map(Decimal::new)
}
