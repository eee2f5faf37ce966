// Patient domain routes
// 환자 도메인 라우터
use axum::{routing::{get, post}, Router};
use crate::domains::patient::handlers::patient_handler;
use crate::shared::services::AppState;

/// Create patient router
/// 환자 라우터 생성
pub fn create_patient_router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(patient_handler::signup))
        .route("/signin", post(patient_handler::signin))
        .route("/me", get(patient_handler::get_me))  // 인증 필요
}
