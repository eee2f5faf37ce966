use serde::{Deserialize, Serialize};

/// JWT Claims (토큰에 포함될 데이터)
/// JWT Claims (data to be included in token)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub patient_id: u64,
    pub email: String,
    /// 만료 시간 (Unix timestamp)
    pub exp: i64,
    /// 발급 시간 (Unix timestamp)
    pub iat: i64,
}

impl Claims {
    /// 새 Claims 생성 (만료 시간 자동 계산)
    /// Create new Claims (expiration time automatically calculated)
    pub fn new(patient_id: u64, email: String, expiration_hours: i64) -> Self {
        let now = chrono::Utc::now().timestamp();
        let exp = now.saturating_add(expiration_hours.saturating_mul(3600)); // hours to seconds

        Self {
            patient_id,
            email,
            exp,
            iat: now,
        }
    }
}
