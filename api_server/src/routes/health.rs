use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;
use crate::shared::services::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    /// "up" | "down" | "disabled"
    pub database: String,
}

// 헬스 체크
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Database unreachable", body = HealthResponse)
    ),
    tag = "Health"
)]
pub async fn health_check(State(app_state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let Some(db) = app_state.db.as_ref() else {
        return HealthResponse::new(StatusCode::OK, "ok", "disabled");
    };

    match db.ping().await {
        Ok(()) => HealthResponse::new(StatusCode::OK, "ok", "up"),
        Err(e) => {
            tracing::warn!(error = %e, "health check: database unreachable");
            HealthResponse::new(StatusCode::SERVICE_UNAVAILABLE, "degraded", "down")
        }
    }
}

impl HealthResponse {
    fn new(code: StatusCode, status: &str, database: &str) -> (StatusCode, Json<Self>) {
        let body = Self {
            status: status.to_string(),
            database: database.to_string(),
        };
        (code, Json(body))
    }
}
