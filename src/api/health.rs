use axum::extract::State;
use axum::Json;

use super::AppState;

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Readiness plus where the cached table is in its refresh cycle.
pub async fn ready(State(state): State<AppState>) -> Json<serde_json::Value> {
    let refresh = state.service.refresh_state().await;
    Json(serde_json::json!({"status": "ready", "refresh": refresh}))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_returns_ok() {
        let Json(body) = health().await;
        assert_eq!(body["status"], "ok");
    }
}
