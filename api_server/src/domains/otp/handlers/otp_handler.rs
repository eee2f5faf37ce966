use crate::domains::otp::models::{MessageResponse, SendOtpRequest, VerifyOtpRequest};
use crate::shared::services::AppState;
use crate::shared::errors::{json_body, ApiError, OtpError};
use axum::{extract::{rejection::JsonRejection, State}, Json};

// OTP 발송 핸들러
#[utoipa::path(
    post,
    path = "/api/otp/send",
    request_body = SendOtpRequest,
    responses(
        (status = 200, description = "OTP sent successfully", body = MessageResponse),
        (status = 400, description = "Invalid email, unknown patient, already verified or cooldown"),
        (status = 500, description = "Email delivery or database failure")
    ),
    tag = "OTP"
)]
pub async fn send_otp(
    State(app_state): State<AppState>,
    payload: Result<Json<SendOtpRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let request = json_body(payload)?;

    app_state
        .otp_state
        .otp_service
        .send_verification_email(&request.email)
        .await
        .map_err(|e: OtpError| -> ApiError { e.into() })?;

    Ok(Json(MessageResponse::new("OTP sent successfully")))
}

// OTP 검증 핸들러
#[utoipa::path(
    post,
    path = "/api/otp/verify",
    request_body = VerifyOtpRequest,
    responses(
        (status = 200, description = "Email verified", body = MessageResponse),
        (status = 400, description = "Invalid, expired or exhausted OTP"),
        (status = 500, description = "Internal server error")
    ),
    tag = "OTP"
)]
pub async fn verify_otp(
    State(app_state): State<AppState>,
    payload: Result<Json<VerifyOtpRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let request = json_body(payload)?;

    app_state
        .otp_state
        .otp_service
        .verify_email(&request.email, &request.otp)
        .await
        .map_err(|e: OtpError| -> ApiError { e.into() })?;

    Ok(Json(MessageResponse::new("Email verified")))
}
