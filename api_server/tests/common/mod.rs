// =====================================================
// 통합 테스트 공통 헬퍼
// =====================================================
// 목적: 인메모리 저장소 + 기록용 메일 sender로 전체 Router 구성
//
// 사용법:
// ```rust
// mod common;
// use common::*;
//
// #[tokio::test]
// async fn test_something() {
//     let app = TestApp::new();
//     let (status, body) = app.post_json("/api/patients/signup", signup_body("a@example.com")).await;
// }
// ```
// =====================================================
#![allow(dead_code)]

use std::sync::Arc;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;
use tower_http::cors::CorsLayer;

use patient_api::build_app;
use patient_api::domains::patient::services::JwtService;
use patient_api::shared::clients::mock::RecordingEmailSender;
use patient_api::shared::config::OtpConfig;
use patient_api::shared::database::{InMemoryOtpRepository, InMemoryPatientRepository};
use patient_api::shared::services::AppState;

pub const TEST_JWT_SECRET: &str = "integration-test-secret";
pub const TEST_PASSWORD: &str = "Passw0rd!";

pub struct TestApp {
    pub router: Router,
    pub patients: Arc<InMemoryPatientRepository>,
    pub otps: Arc<InMemoryOtpRepository>,
    pub mailer: Arc<RecordingEmailSender>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_mailer(RecordingEmailSender::new())
    }

    /// 메일 발송이 항상 실패하는 앱
    pub fn with_failing_mailer() -> Self {
        Self::with_mailer(RecordingEmailSender::failing())
    }

    fn with_mailer(mailer: RecordingEmailSender) -> Self {
        let patients = Arc::new(InMemoryPatientRepository::new());
        let otps = Arc::new(InMemoryOtpRepository::new());
        let mailer = Arc::new(mailer);

        let state = AppState::with_parts(
            patients.clone(),
            otps.clone(),
            mailer.clone(),
            JwtService::new(TEST_JWT_SECRET, 1),
            OtpConfig::default(),
        );

        Self {
            router: build_app(state, CorsLayer::new()),
            patients,
            otps,
            mailer,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("JSON response body")
        };
        (status, body)
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.post_raw(uri, body.to_string()).await
    }

    pub async fn post_raw(&self, uri: &str, body: impl Into<String>) -> (StatusCode, Value) {
        let request = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.into()))
            .expect("valid request");
        self.send(request).await
    }

    pub async fn get(&self, uri: &str, bearer: Option<&str>) -> (StatusCode, Value) {
        let mut builder = Request::get(uri);
        if let Some(token) = bearer {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        self.send(builder.body(Body::empty()).expect("valid request")).await
    }

    /// 회원가입 후 생성된 환자 JSON 반환
    pub async fn signup(&self, email: &str) -> Value {
        let (status, body) = self.post_json("/api/patients/signup", signup_body(email)).await;
        assert_eq!(status, StatusCode::OK, "signup failed: {body}");
        body["patient"].clone()
    }

    /// 로그인 후 access token 반환
    pub async fn signin(&self, email: &str) -> String {
        let (status, body) = self
            .post_json(
                "/api/patients/signin",
                json!({ "email": email, "password": TEST_PASSWORD }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "signin failed: {body}");
        body["token"].as_str().expect("token").to_string()
    }

    /// 마지막으로 발송된 메일에서 6자리 코드 추출
    pub fn last_code_for(&self, email: &str) -> String {
        let mail = self.mailer.last_to(email).expect("an email was sent");
        mail.text_body
            .split(|c: char| !c.is_ascii_digit())
            .find(|part| part.len() == 6)
            .expect("six digit code in body")
            .to_string()
    }
}

pub fn signup_body(email: &str) -> Value {
    json!({
        "firstName": "Asha",
        "lastName": "Rao",
        "email": email,
        "phone": "9876543210",
        "password": TEST_PASSWORD
    })
}
