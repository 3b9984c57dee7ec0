use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::AppState;
use crate::domain::{Asset, PnlRecord, DATE_FORMAT};
use crate::engine::SelectionError;
use crate::error::AppError;

fn parse_assets(input: &str) -> Vec<Asset> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(Asset::new)
        .collect()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PnlQuery {
    /// Comma-separated asset list; all assets when absent.
    pub assets: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PnlResponse {
    pub records: Vec<PnlRecordDto>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PnlRecordDto {
    pub asset: String,
    pub timestamp: i64,
    pub date: String,
    pub market_debt: String,
    pub net_transfers: String,
    pub fees_paid: String,
    pub net_pnl: String,
    pub staker_pnl: String,
}

impl From<&PnlRecord> for PnlRecordDto {
    fn from(record: &PnlRecord) -> Self {
        Self {
            asset: record.asset.to_string(),
            timestamp: record.timestamp.as_secs(),
            date: record.date_string(),
            market_debt: record.market_debt.to_canonical_string(),
            net_transfers: record.net_transfers.to_canonical_string(),
            fees_paid: record.fees_paid.to_canonical_string(),
            net_pnl: record.net_pnl.to_canonical_string(),
            staker_pnl: record.staker_pnl.to_canonical_string(),
        }
    }
}

pub async fn get_pnl(
    Query(params): Query<PnlQuery>,
    State(state): State<AppState>,
) -> Result<Json<PnlResponse>, AppError> {
    let table = state.service.table().await?;

    let records = match params.assets.as_deref() {
        None => table.records().iter().map(PnlRecordDto::from).collect(),
        Some(raw) => {
            let selected = parse_assets(raw);
            table
                .select(&selected)
                .map_err(|SelectionError::UnknownAsset(a)| {
                    AppError::BadRequest(format!("Unknown asset: {}", a))
                })?
                .into_iter()
                .map(PnlRecordDto::from)
                .collect()
        }
    };

    Ok(Json(PnlResponse { records }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PnlTotalResponse {
    pub points: Vec<PnlTotalDto>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PnlTotalDto {
    pub date: String,
    pub net_pnl: String,
    pub staker_pnl: String,
}

/// Staker and net PnL summed across markets per date.
pub async fn get_pnl_total(
    State(state): State<AppState>,
) -> Result<Json<PnlTotalResponse>, AppError> {
    let table = state.service.table().await?;
    let points = table
        .totals_by_date()?
        .into_iter()
        .map(|t| PnlTotalDto {
            date: t.date.format(DATE_FORMAT).to_string(),
            net_pnl: t.net_pnl.to_canonical_string(),
            staker_pnl: t.staker_pnl.to_canonical_string(),
        })
        .collect();
    Ok(Json(PnlTotalResponse { points }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketPnlResponse {
    pub asset: String,
    pub points: Vec<MarketPnlPoint>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketPnlPoint {
    pub date: String,
    pub timestamp: i64,
    pub staker_pnl: String,
    pub fees_paid: String,
}

/// Staker PnL and cumulative fees for one market.
pub async fn get_market_pnl(
    Path(asset): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<MarketPnlResponse>, AppError> {
    let asset = Asset::new(asset.trim());
    let table = state.service.table().await?;

    let rows = table
        .for_asset(&asset)
        .map_err(|SelectionError::UnknownAsset(a)| {
            AppError::NotFound(format!("Unknown asset: {}", a))
        })?;

    let points = rows
        .iter()
        .map(|r| MarketPnlPoint {
            date: r.date_string(),
            timestamp: r.timestamp.as_secs(),
            staker_pnl: r.staker_pnl.to_canonical_string(),
            fees_paid: r.fees_paid.to_canonical_string(),
        })
        .collect();

    Ok(Json(MarketPnlResponse {
        asset: asset.to_string(),
        points,
    }))
}
