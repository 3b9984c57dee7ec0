use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;

use super::AppState;
use crate::error::AppError;
use crate::export::{table_to_csv, EXPORT_FILE_NAME};

/// Full PnL table as a CSV download.
pub async fn get_export(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let table = state.service.table().await?;
    let body = table_to_csv(&table)?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", EXPORT_FILE_NAME),
            ),
        ],
        body,
    ))
}
