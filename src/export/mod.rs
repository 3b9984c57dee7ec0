//! Comma-separated export of the PnL table, and loading a previously exported file.
//!
//! Column order: asset, timestamp, market_debt, net_transfers, fees_paid, date,
//! net_pnl, staker_pnl. Header row, no index column.

use crate::domain::{Asset, DebtSnapshot, Decimal, PnlRecord, Timestamp};
use crate::engine::{PnlDeriver, PnlTable};
use std::io::{Read, Write};
use thiserror::Error;
use tracing::warn;

pub const CSV_HEADER: [&str; 8] = [
    "asset",
    "timestamp",
    "market_debt",
    "net_transfers",
    "fees_paid",
    "date",
    "net_pnl",
    "staker_pnl",
];

/// Suggested file name for downloads.
pub const EXPORT_FILE_NAME: &str = "market_pnl.csv";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed csv line {line}: {reason}")]
    Malformed { line: u64, reason: String },
}

/// Write records as CSV to `writer`.
pub fn write_csv<'a, W, I>(writer: W, records: I) -> Result<(), ExportError>
where
    W: Write,
    I: IntoIterator<Item = &'a PnlRecord>,
{
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(CSV_HEADER)?;
    for record in records {
        let fields: [String; 8] = [
            record.asset.to_string(),
            record.timestamp.as_secs().to_string(),
            record.market_debt.to_canonical_string(),
            record.net_transfers.to_canonical_string(),
            record.fees_paid.to_canonical_string(),
            record.date_string(),
            record.net_pnl.to_canonical_string(),
            record.staker_pnl.to_canonical_string(),
        ];
        csv_writer.write_record(&fields)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Render the whole table as CSV bytes.
pub fn table_to_csv(table: &PnlTable) -> Result<Vec<u8>, ExportError> {
    let mut buf = Vec::new();
    write_csv(&mut buf, table.records())?;
    Ok(buf)
}

/// Load a table from an exported CSV.
///
/// `date`, `net_pnl` and `staker_pnl` are recomputed from timestamp, debt,
/// transfers and fees, so the PnL equation holds for every loaded row even when
/// the file was produced with floating-point arithmetic.
pub fn read_csv<R: Read>(reader: R) -> Result<PnlTable, ExportError> {
    #[derive(Debug, serde::Deserialize)]
    struct Row {
        asset: String,
        timestamp: String,
        market_debt: String,
        net_transfers: String,
        fees_paid: String,
        net_pnl: String,
    }

    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let mut raw = csv::StringRecord::new();
    let mut records = Vec::new();
    while csv_reader.read_record(&mut raw)? {
        // Physical line where the record starts; quoted fields may span lines.
        let line = raw.position().map(|p| p.line()).unwrap_or_default();
        let row: Row = raw.deserialize(Some(&headers))?;
        let malformed = |reason: String| ExportError::Malformed { line, reason };
        let decimal = |name: &str, value: &str| {
            Decimal::from_str_canonical(value)
                .map_err(|e| malformed(format!("invalid {} {:?}: {}", name, value, e)))
        };

        let asset = row.asset.trim();
        if asset.is_empty() {
            return Err(malformed("empty asset".to_string()));
        }
        let secs = row
            .timestamp
            .trim()
            .parse::<i64>()
            .map_err(|e| malformed(format!("invalid timestamp {:?}: {}", row.timestamp, e)))?;
        let timestamp = Timestamp::from_secs(secs).map_err(|e| malformed(e.to_string()))?;

        let snapshot = DebtSnapshot::new(
            Asset::new(asset),
            timestamp,
            decimal("market_debt", &row.market_debt)?,
        );
        let record = PnlDeriver::derive(
            &snapshot,
            decimal("net_transfers", &row.net_transfers)?,
            decimal("fees_paid", &row.fees_paid)?,
        )
        .map_err(|e| malformed(e.to_string()))?;

        let stored_net_pnl = decimal("net_pnl", &row.net_pnl)?;
        if stored_net_pnl != record.net_pnl {
            warn!(
                line,
                stored = %stored_net_pnl,
                derived = %record.net_pnl,
                "Stored net_pnl differs from derived value, using derived"
            );
        }
        records.push(record);
    }

    Ok(PnlTable::new(records))
}
