use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
};
use crate::shared::services::AppState;
use crate::shared::errors::{error_response, ApiError, PatientError};

/// 인증된 환자 정보 (JWT 토큰에서 추출)
/// Authenticated patient extracted from the Bearer token
///
/// 사용법:
/// ```ignore
/// pub async fn get_me(
///     State(app_state): State<AppState>,
///     authenticated: AuthenticatedPatient,
/// ) -> Result<...> {
///     let patient_id = authenticated.patient_id;
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthenticatedPatient {
    pub patient_id: u64,
    pub email: String,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedPatient {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // 1. Authorization 헤더에서 토큰 추출
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or_else(|| -> ApiError { PatientError::MissingToken.into() })?
            .to_str()
            .map_err(|_| error_response(StatusCode::UNAUTHORIZED, "Invalid authorization header"))?;

        // 2. "Bearer <token>" 형식 파싱
        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            error_response(
                StatusCode::UNAUTHORIZED,
                "Invalid authorization format. Expected: 'Bearer <token>'",
            )
        })?;

        // 3. JWT 검증
        let claims = state
            .patient_state
            .jwt_service
            .verify_access_token(token.trim())
            .map_err(|e| -> ApiError { e.into() })?;

        Ok(AuthenticatedPatient {
            patient_id: claims.patient_id,
            email: claims.email,
        })
    }
}
