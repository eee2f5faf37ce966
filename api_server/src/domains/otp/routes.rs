// OTP domain routes
// OTP 도메인 라우터
use axum::{routing::post, Router};
use crate::domains::otp::handlers::otp_handler;
use crate::shared::services::AppState;

/// Create OTP router
pub fn create_otp_router() -> Router<AppState> {
    Router::new()
        .route("/send", post(otp_handler::send_otp))
        .route("/verify", post(otp_handler::verify_otp))
}
