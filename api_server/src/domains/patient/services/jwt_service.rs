// src/domains/patient/services/jwt_service.rs
use crate::shared::errors::PatientError;
use crate::domains::patient::models::jwt::Claims;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

/// JWT 서비스
/// JWT Service for token generation and verification
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiration_hours: i64,
}

impl JwtService {
    /// JWT Service 생성
    /// Create JWT Service
    pub fn new(secret: &str, expiration_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expiration_hours,
        }
    }

    /// Access Token 발급
    /// Generate Access Token
    pub fn generate_access_token(&self, patient_id: u64, email: String) -> Result<String, PatientError> {
        let claims = Claims::new(patient_id, email, self.expiration_hours);

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| PatientError::Internal(format!("Failed to generate access token: {}", e)))
    }

    /// Access Token 검증 (서명 + 만료)
    /// Verify Access Token
    pub fn verify_access_token(&self, token: &str) -> Result<Claims, PatientError> {
        let validation = Validation::default();

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| {
                tracing::debug!(error = %e, "access token rejected");
                PatientError::InvalidToken
            })?;

        Ok(token_data.claims)
    }
}
