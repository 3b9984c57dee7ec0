use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::{Asset, Decimal, PnlRecord};

use super::AggregateError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("unknown asset: {0}")]
    UnknownAsset(Asset),
}

/// Cross-asset PnL at one date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PnlTotal {
    pub date: DateTime<Utc>,
    pub net_pnl: Decimal,
    pub staker_pnl: Decimal,
}

/// The derived PnL collection, sorted by (asset, timestamp).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PnlTable {
    records: Vec<PnlRecord>,
    assets: Vec<Asset>,
}

impl PnlTable {
    /// Build a table, sorting records by (asset, timestamp).
    ///
    /// The sort is stable; duplicate (asset, timestamp) rows are kept in input order.
    pub fn new(mut records: Vec<PnlRecord>) -> Self {
        records.sort_by(|a, b| {
            a.asset
                .cmp(&b.asset)
                .then_with(|| a.timestamp.cmp(&b.timestamp))
        });
        let mut assets: Vec<Asset> = records.iter().map(|r| r.asset.clone()).collect();
        assets.dedup();
        Self { records, assets }
    }

    pub fn records(&self) -> &[PnlRecord] {
        &self.records
    }

    /// Distinct assets present in the table, ascending.
    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    pub fn contains_asset(&self, asset: &Asset) -> bool {
        self.assets.binary_search(asset).is_ok()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rows for one asset, ascending by timestamp.
    pub fn for_asset(&self, asset: &Asset) -> Result<&[PnlRecord], SelectionError> {
        if !self.contains_asset(asset) {
            return Err(SelectionError::UnknownAsset(asset.clone()));
        }
        let start = self.records.partition_point(|r| r.asset < *asset);
        let end = self.records.partition_point(|r| r.asset <= *asset);
        Ok(&self.records[start..end])
    }

    /// Rows for a set of assets, in table order.
    ///
    /// Fails on the first requested asset that is not in the table.
    pub fn select(&self, assets: &[Asset]) -> Result<Vec<&PnlRecord>, SelectionError> {
        if let Some(missing) = assets.iter().find(|a| !self.contains_asset(a)) {
            return Err(SelectionError::UnknownAsset(missing.clone()));
        }
        Ok(self
            .records
            .iter()
            .filter(|r| assets.contains(&r.asset))
            .collect())
    }

    /// Sum of net and staker PnL across assets for each distinct date.
    ///
    /// # Errors
    /// Returns `AggregateError::TotalOverflow` when a date's sum leaves the
    /// decimal range.
    pub fn totals_by_date(&self) -> Result<Vec<PnlTotal>, AggregateError> {
        let mut by_date: BTreeMap<DateTime<Utc>, (Decimal, Decimal)> = BTreeMap::new();
        for record in &self.records {
            let overflow = |column| AggregateError::TotalOverflow {
                date: record.date_string(),
                column,
            };
            let entry = by_date.entry(record.date).or_default();
            entry.0 = entry
                .0
                .checked_add(record.net_pnl)
                .ok_or_else(|| overflow("net_pnl"))?;
            entry.1 = entry
                .1
                .checked_add(record.staker_pnl)
                .ok_or_else(|| overflow("staker_pnl"))?;
        }
        Ok(by_date
            .into_iter()
            .map(|(date, (net_pnl, staker_pnl))| PnlTotal {
                date,
                net_pnl,
                staker_pnl,
            })
            .collect())
    }
}
