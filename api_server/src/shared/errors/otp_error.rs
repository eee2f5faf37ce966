use thiserror::Error;
use axum::{http::StatusCode, Json};
use serde_json::json;

/// OTP 발송/검증 에러
/// Errors raised by the email OTP flow
#[derive(Error, Debug)]
pub enum OtpError {
    #[error("{0}")]
    InvalidEmail(&'static str),

    #[error("Patient not found")]
    PatientNotFound { email: String },

    #[error("Email already verified")]
    AlreadyVerified,

    /// 쿨다운 중 재발송 요청
    /// A new code was requested before the cooldown elapsed
    #[error("Please wait {retry_after_secs} seconds before requesting another OTP")]
    ResendTooSoon { retry_after_secs: u64 },

    #[error("Invalid OTP")]
    InvalidOtp,

    #[error("OTP expired")]
    OtpExpired,

    #[error("Too many failed attempts, request a new OTP")]
    TooManyAttempts,

    #[error("Failed to send verification email: {0}")]
    MailDelivery(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl OtpError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            OtpError::MailDelivery(_) | OtpError::DatabaseError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

/// OtpError를 HTTP 응답으로 변환
impl From<OtpError> for (StatusCode, Json<serde_json::Value>) {
    fn from(err: OtpError) -> Self {
        let status = err.status_code();
        if status.is_server_error() {
            tracing::error!(error = %err, "otp request failed");
        }
        (status, Json(json!({ "error": err.to_string() })))
    }
}
