// Patient onboarding API: signup, sign-in and email OTP verification
pub mod domains;
pub mod shared;
pub mod routes;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use routes::create_router;
use routes::health::HealthResponse;
use crate::shared::services::AppState;

// Import models for OpenAPI schema
use crate::domains::patient::models::*;
use crate::domains::otp::models::*;

// OpenAPI 스키마 정의: Swagger 문서 자동 생성
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::domains::patient::handlers::patient_handler::signup,
        crate::domains::patient::handlers::patient_handler::signin,
        crate::domains::patient::handlers::patient_handler::get_me,
        crate::domains::otp::handlers::otp_handler::send_otp,
        crate::domains::otp::handlers::otp_handler::verify_otp,
        crate::routes::health::health_check
    ),
    components(schemas(
        SignupRequest,
        SignupResponse,
        SigninRequest,
        SigninResponse,
        PatientResponse,
        SendOtpRequest,
        VerifyOtpRequest,
        MessageResponse,
        HealthResponse
    )),
    modifiers(
        &SecurityAddon
    ),
    tags(
        (name = "Patients", description = "Patient signup and sign-in endpoints"),
        (name = "OTP", description = "Email verification (one-time password) endpoints"),
        (name = "Health", description = "Liveness and database connectivity")
    ),
    info(
        title = "Patient API Server",
        description = "Patient onboarding API with email OTP verification",
        version = "1.0.0"
    )
)]
pub struct ApiDoc;

// Security scheme 정의: Swagger UI에서 "Authorize" 버튼 추가
struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "BearerAuth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}

/// 전체 애플리케이션 Router 생성
/// Build the full application: API routes, Swagger UI, tracing and CORS
pub fn build_app(app_state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .merge(create_router())
        .merge(
            SwaggerUi::new("/api")
                .url("/api-docs/openapi.json", ApiDoc::openapi())
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}
