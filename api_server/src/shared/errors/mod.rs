// Shared errors
pub mod patient_error;
pub mod otp_error;

pub use patient_error::*;
pub use otp_error::*;

use axum::{extract::rejection::JsonRejection, http::StatusCode, Json};
use serde_json::json;

/// 핸들러 에러 응답 타입: (상태 코드, `{ "error": ... }`)
/// Error response returned by every handler
pub type ApiError = (StatusCode, Json<serde_json::Value>);

pub fn error_response(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(json!({ "error": message.into() })))
}

/// JSON 바디 파싱 실패를 400 `{error}` 응답으로 변환
/// Map a body extraction failure to a 400 JSON error
pub fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| error_response(StatusCode::BAD_REQUEST, rejection.body_text()))
}
