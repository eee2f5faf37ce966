use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

/// 환자 엔티티 (DB 레코드)
/// Patient record as stored; never serialized directly
#[derive(Debug, Clone)]
pub struct Patient {
    pub id: u64,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 환자 생성 데이터 (비밀번호는 이미 해싱됨)
/// Insert payload; `password_hash` must already be hashed
#[derive(Debug, Clone)]
pub struct PatientCreate {
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
}

/// 환자 정보 응답 (비밀번호 제외)
/// Patient as returned by the API (without password)
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(as = PatientResponse)]
pub struct PatientResponse {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "patient@example.com")]
    pub email: String,

    #[schema(example = "Asha")]
    pub first_name: String,

    #[schema(example = "Rao")]
    pub last_name: String,

    #[schema(example = "9876543210")]
    pub phone: String,

    /// OTP 인증 완료 여부
    /// Whether the email has been verified by OTP
    pub is_verified: bool,

    pub created_at: DateTime<Utc>,
}

impl From<Patient> for PatientResponse {
    fn from(patient: Patient) -> Self {
        Self {
            id: patient.id,
            email: patient.email,
            first_name: patient.first_name,
            last_name: patient.last_name,
            phone: patient.phone,
            is_verified: patient.is_verified,
            created_at: patient.created_at,
        }
    }
}
