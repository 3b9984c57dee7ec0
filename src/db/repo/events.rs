//! Trade, transfer and debt snapshot operations for the repository.

use crate::domain::{DebtSnapshot, Decimal, Trade, Transfer};
use tracing::debug;

use super::{parse_event_row, EventRow, RepoError, Repository};

impl Repository {
    // =========================================================================
    // Insert operations
    // =========================================================================

    /// Insert trades in a single transaction.
    ///
    /// Returns the number of inserted rows.
    ///
    /// # Errors
    /// Returns an error if the transaction fails.
    pub async fn insert_trades_batch(&self, trades: &[Trade]) -> Result<usize, sqlx::Error> {
        let rows: Vec<_> = trades
            .iter()
            .map(|t| (t.asset.as_str(), t.timestamp.as_secs(), t.fee_paid))
            .collect();
        self.insert_events("trades", "feespaid", &rows).await
    }

    /// Insert transfers in a single transaction.
    ///
    /// # Errors
    /// Returns an error if the transaction fails.
    pub async fn insert_transfers_batch(&self, transfers: &[Transfer]) -> Result<usize, sqlx::Error> {
        let rows: Vec<_> = transfers
            .iter()
            .map(|t| (t.asset.as_str(), t.timestamp.as_secs(), t.size))
            .collect();
        self.insert_events("transfers", "size", &rows).await
    }

    /// Insert debt snapshots in a single transaction.
    ///
    /// # Errors
    /// Returns an error if the transaction fails.
    pub async fn insert_debt_snapshots_batch(
        &self,
        snapshots: &[DebtSnapshot],
    ) -> Result<usize, sqlx::Error> {
        let rows: Vec<_> = snapshots
            .iter()
            .map(|s| (s.asset.as_str(), s.timestamp.as_secs(), s.market_debt))
            .collect();
        self.insert_events("market_debt", "market_debt", &rows).await
    }

    async fn insert_events(
        &self,
        table: &'static str,
        measure_column: &'static str,
        rows: &[(&str, i64, Decimal)],
    ) -> Result<usize, sqlx::Error> {
        if rows.is_empty() {
            return Ok(0);
        }

        let sql = format!(
            "INSERT INTO {} (asset, timestamp, {}) VALUES (?, ?, ?)",
            table, measure_column
        );

        let mut total_inserted = 0usize;
        let mut tx = self.pool.begin().await?;

        for (asset, timestamp, measure) in rows {
            let result = sqlx::query(&sql)
                .bind(*asset)
                .bind(*timestamp)
                .bind(measure.to_canonical_string())
                .execute(&mut *tx)
                .await?;
            total_inserted += result.rows_affected() as usize;
        }

        tx.commit().await?;
        debug!(table, inserted = total_inserted, "Inserted event rows");
        Ok(total_inserted)
    }

    // =========================================================================
    // Query operations
    // =========================================================================

    /// Load every trade, ordered by (asset, timestamp, insertion order).
    ///
    /// # Errors
    /// Returns `RepoError::Malformed` for a non-integer timestamp, a non-numeric
    /// fee or a negative fee; the whole read fails.
    pub async fn query_trades(&self) -> Result<Vec<Trade>, RepoError> {
        let rows = self.query_events("trades", "feespaid").await?;
        rows.into_iter()
            .map(|row| {
                if row.measure.is_negative() {
                    return Err(RepoError::Malformed {
                        table: "trades",
                        row_id: row.row_id,
                        reason: format!("negative fee {}", row.measure),
                    });
                }
                Ok(Trade::new(row.asset, row.timestamp, row.measure))
            })
            .collect()
    }

    /// Load every transfer, ordered by (asset, timestamp, insertion order).
    pub async fn query_transfers(&self) -> Result<Vec<Transfer>, RepoError> {
        let rows = self.query_events("transfers", "size").await?;
        Ok(rows
            .into_iter()
            .map(|row| Transfer::new(row.asset, row.timestamp, row.measure))
            .collect())
    }

    /// Load every debt snapshot, ordered by (asset, timestamp, insertion order).
    pub async fn query_debt_snapshots(&self) -> Result<Vec<DebtSnapshot>, RepoError> {
        let rows = self.query_events("market_debt", "market_debt").await?;
        Ok(rows
            .into_iter()
            .map(|row| DebtSnapshot::new(row.asset, row.timestamp, row.measure))
            .collect())
    }

    async fn query_events(
        &self,
        table: &'static str,
        measure_column: &'static str,
    ) -> Result<Vec<EventRow>, RepoError> {
        let sql = format!(
            "SELECT id, asset, timestamp, {} FROM {} ORDER BY asset ASC, timestamp ASC, id ASC",
            measure_column, table
        );

        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

        rows.iter()
            .map(|row| parse_event_row(table, measure_column, row))
            .collect()
    }
}
