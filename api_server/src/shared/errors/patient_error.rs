use std::collections::BTreeMap;
use thiserror::Error;
use axum::{http::StatusCode, Json};
use serde_json::json;

/// 필드별 검증 에러 (필드명 -> 메시지)
/// Field name -> validation message, ordered by field name
pub type ValidationErrors = BTreeMap<&'static str, &'static str>;

/// 환자 인증 관련 에러
/// Patient signup/sign-in errors
#[derive(Error, Debug)]
pub enum PatientError {
    /// 입력값 검증 실패
    /// Input failed field validation
    #[error("Validation failed")]
    Validation(ValidationErrors),

    /// 이메일이 이미 존재함
    /// Email already exists
    #[error("User already exists with this email")]
    EmailAlreadyExists { email: String },

    /// 잘못된 이메일 또는 비밀번호
    /// Invalid email or password
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// 환자를 찾을 수 없음
    /// Patient not found
    #[error("Patient not found")]
    PatientNotFound { id: u64 },

    #[error("Failed to hash password: {0}")]
    PasswordHashingFailed(String),

    #[error("Failed to verify password: {0}")]
    PasswordVerificationFailed(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    /// 잘못된 또는 만료된 토큰
    /// Invalid or expired token
    #[error("Invalid or expired token")]
    InvalidToken,

    /// 토큰이 제공되지 않음
    /// Token not provided
    #[error("Token not provided")]
    MissingToken,
}

impl PatientError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            PatientError::Validation(_)
            | PatientError::EmailAlreadyExists { .. }
            | PatientError::InvalidCredentials
            | PatientError::PatientNotFound { .. } => StatusCode::BAD_REQUEST,
            PatientError::InvalidToken | PatientError::MissingToken => StatusCode::UNAUTHORIZED,
            PatientError::PasswordHashingFailed(_)
            | PatientError::PasswordVerificationFailed(_)
            | PatientError::DatabaseError(_)
            | PatientError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// PatientError를 HTTP 응답으로 변환
impl From<PatientError> for (StatusCode, Json<serde_json::Value>) {
    fn from(err: PatientError) -> Self {
        let status = err.status_code();
        if status.is_server_error() {
            tracing::error!(error = %err, "patient request failed");
        }

        let body = match &err {
            PatientError::Validation(details) => {
                json!({ "error": err.to_string(), "details": details })
            }
            _ => json!({ "error": err.to_string() }),
        };

        (status, Json(body))
    }
}
