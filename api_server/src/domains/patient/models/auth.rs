use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use crate::domains::patient::models::patient::PatientResponse;

// 회원가입 요청 모델
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(as = SignupRequest)]
pub struct SignupRequest {
    #[serde(default)]
    #[schema(example = "Asha")]
    pub first_name: String,

    #[serde(default)]
    #[schema(example = "Rao")]
    pub last_name: String,

    /// Email address (login key)
    /// 이메일 주소
    #[serde(default)]
    #[schema(example = "patient@example.com")]
    pub email: String,

    /// 10자리 휴대폰 번호
    #[serde(default)]
    #[schema(example = "9876543210")]
    pub phone: String,

    /// Password (will be hashed)
    /// 비밀번호 (해싱됨)
    #[serde(default)]
    #[schema(example = "Passw0rd!")]
    pub password: String,
}

// 회원가입 응답 모델
#[derive(Debug, Serialize, ToSchema)]
#[schema(as = SignupResponse)]
pub struct SignupResponse {
    pub success: bool,

    /// Success message
    /// 성공 메시지
    pub message: String,

    pub patient: PatientResponse,
}

// 로그인 요청 모델
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(as = SigninRequest)]
pub struct SigninRequest {
    #[serde(default)]
    #[schema(example = "patient@example.com")]
    pub email: String,

    #[serde(default)]
    #[schema(example = "Passw0rd!")]
    pub password: String,
}

// 로그인 응답 모델
#[derive(Debug, Serialize, ToSchema)]
#[schema(as = SigninResponse)]
pub struct SigninResponse {
    pub message: String,

    /// JWT Access Token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub token: String,

    pub patient: PatientResponse,
}
