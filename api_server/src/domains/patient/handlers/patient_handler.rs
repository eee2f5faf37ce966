use crate::domains::patient::models::{
    SignupRequest, SignupResponse, SigninRequest, SigninResponse, PatientResponse,
};
use crate::shared::services::AppState;
use crate::shared::errors::{json_body, ApiError, PatientError};
use crate::shared::middleware::auth::AuthenticatedPatient;
use axum::{extract::{rejection::JsonRejection, State}, Json};

// 회원가입 핸들러
#[utoipa::path(
    post,
    path = "/api/patients/signup",
    request_body = SignupRequest,
    responses(
        (status = 200, description = "Patient created successfully", body = SignupResponse),
        (status = 400, description = "Validation failed or email already exists"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Patients"
)]
pub async fn signup(
    State(app_state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<Json<SignupResponse>, ApiError> {
    let request = json_body(payload)?;

    let patient = app_state
        .patient_state
        .patient_service
        .signup(request)
        .await
        .map_err(|e: PatientError| -> ApiError { e.into() })?;

    Ok(Json(SignupResponse {
        success: true,
        message: "Patient created successfully".to_string(),
        patient: patient.into(),
    }))
}

// 로그인 핸들러
#[utoipa::path(
    post,
    path = "/api/patients/signin",
    request_body = SigninRequest,
    responses(
        (status = 200, description = "Sign-in successful", body = SigninResponse),
        (status = 400, description = "Invalid credentials"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Patients"
)]
pub async fn signin(
    State(app_state): State<AppState>,
    payload: Result<Json<SigninRequest>, JsonRejection>,
) -> Result<Json<SigninResponse>, ApiError> {
    let request = json_body(payload)?;

    let (patient, token) = app_state
        .patient_state
        .patient_service
        .signin(request)
        .await
        .map_err(|e: PatientError| -> ApiError { e.into() })?;

    Ok(Json(SigninResponse {
        message: "Sign-in successful".to_string(),
        token,
        patient: patient.into(),
    }))
}

/// 현재 로그인한 환자 정보
/// Current patient, resolved from the Bearer token
#[utoipa::path(
    get,
    path = "/api/patients/me",
    responses(
        (status = 200, description = "Patient info retrieved successfully", body = PatientResponse),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("BearerAuth" = [])
    ),
    tag = "Patients"
)]
pub async fn get_me(
    State(app_state): State<AppState>,
    authenticated: AuthenticatedPatient,
) -> Result<Json<PatientResponse>, ApiError> {
    tracing::debug!(
        patient_id = authenticated.patient_id,
        email = %authenticated.email,
        "resolving current patient"
    );

    let patient = app_state
        .patient_state
        .patient_service
        .get_patient(authenticated.patient_id)
        .await
        .map_err(|e| -> ApiError {
            match e {
                // 토큰은 유효하지만 환자가 없는 경우
                PatientError::PatientNotFound { .. } => PatientError::InvalidToken.into(),
                other => other.into(),
            }
        })?;

    Ok(Json(patient.into()))
}
