// Routes module: 라우팅 설정
// 역할: 모든 도메인의 라우터를 조합
// Routes module: combines all domain routers

pub mod health;

use axum::{routing::get, Router};
use crate::shared::services::AppState;

// 각 도메인의 routes import
use crate::domains::patient::routes::create_patient_router;
use crate::domains::otp::routes::create_otp_router;

/// Create main router (combines all domain routers)
/// 메인 라우터 생성 (모든 도메인 라우터 조합)
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api/patients", create_patient_router())
        .nest("/api/otp", create_otp_router())
}
