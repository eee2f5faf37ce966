use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 저장된 OTP 레코드 (원본 코드는 저장하지 않음)
/// Stored OTP; only the SHA-256 hash of the code is kept
#[derive(Debug, Clone)]
pub struct OtpRecord {
    pub email: String,
    pub otp_hash: String,
    pub attempts: u32,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl OtpRecord {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

#[derive(Debug, Clone)]
pub struct OtpCreate {
    pub email: String,
    pub otp_hash: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

// OTP 발송 요청
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(as = SendOtpRequest)]
pub struct SendOtpRequest {
    #[serde(default)]
    #[schema(example = "patient@example.com")]
    pub email: String,
}

// OTP 검증 요청
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(as = VerifyOtpRequest)]
pub struct VerifyOtpRequest {
    #[serde(default)]
    #[schema(example = "patient@example.com")]
    pub email: String,

    /// 6자리 숫자 코드
    /// Six-digit code from the email
    #[serde(default)]
    #[schema(example = "482913")]
    pub otp: String,
}

/// 메시지만 담는 응답
#[derive(Debug, Serialize, ToSchema)]
#[schema(as = MessageResponse)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}
