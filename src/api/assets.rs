use axum::extract::State;
use axum::Json;
use serde::Serialize;

use super::AppState;
use crate::error::AppError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetsResponse {
    pub assets: Vec<String>,
}

pub async fn get_assets(State(state): State<AppState>) -> Result<Json<AssetsResponse>, AppError> {
    let table = state.service.table().await?;
    Ok(Json(AssetsResponse {
        assets: table.assets().iter().map(|a| a.to_string()).collect(),
    }))
}
