// =====================================================
// 회원가입 / 로그인 통합 테스트
// =====================================================

mod common;
use common::*;
use axum::http::StatusCode;
use serde_json::json;

/// 테스트: 정상 회원가입 → 200 + 비밀번호 없는 환자 정보
#[tokio::test]
async fn test_signup_returns_patient_without_password() {
    let app = TestApp::new();

    let (status, body) = app
        .post_json("/api/patients/signup", signup_body("Asha@Example.com"))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["message"], json!("Patient created successfully"));
    assert_eq!(body["patient"]["email"], json!("asha@example.com"));
    assert_eq!(body["patient"]["firstName"], json!("Asha"));
    assert_eq!(body["patient"]["isVerified"], json!(false));
    assert!(body["patient"].get("password").is_none());
    assert!(body["patient"].get("passwordHash").is_none());
    assert_eq!(app.patients.len(), 1);
}

/// 테스트: 이미 가입된 이메일 → 400
#[tokio::test]
async fn test_duplicate_email_is_rejected() {
    let app = TestApp::new();
    app.signup("asha@example.com").await;

    let (status, body) = app
        .post_json("/api/patients/signup", signup_body("ASHA@example.com"))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("User already exists with this email"));
    assert_eq!(app.patients.len(), 1);
}

/// 테스트: 여러 필드 검증 실패 → details에 필드별 메시지
#[tokio::test]
async fn test_validation_errors_are_reported_per_field() {
    let app = TestApp::new();

    let (status, body) = app
        .post_json(
            "/api/patients/signup",
            json!({
                "firstName": "",
                "lastName": "Rao",
                "email": "not-an-email",
                "phone": "12345",
                "password": "weak"
            }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("Validation failed"));
    assert_eq!(body["details"]["firstName"], json!("First name is required!"));
    assert_eq!(body["details"]["email"], json!("This is not a valid email format!"));
    assert_eq!(body["details"]["phone"], json!("Not a valid mobile number"));
    assert!(body["details"]["password"].is_string());
    assert!(body["details"].get("lastName").is_none());
    assert!(app.patients.is_empty());
}

/// 테스트: 깨진 JSON → 400 `{error}`
#[tokio::test]
async fn test_malformed_json_is_a_bad_request() {
    let app = TestApp::new();

    let (status, body) = app.post_raw("/api/patients/signup", "{\"email\": ").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

/// 테스트: 로그인 성공 → 토큰으로 /me 조회
#[tokio::test]
async fn test_signin_token_resolves_current_patient() {
    let app = TestApp::new();
    let created = app.signup("asha@example.com").await;

    let (status, body) = app
        .post_json(
            "/api/patients/signin",
            json!({ "email": "asha@example.com", "password": TEST_PASSWORD }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], json!("Sign-in successful"));
    assert_eq!(body["patient"]["id"], created["id"]);

    let token = body["token"].as_str().unwrap();
    let (status, me) = app.get("/api/patients/me", Some(token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["email"], json!("asha@example.com"));
}

/// 테스트: 잘못된 비밀번호 / 없는 이메일 → 동일한 400 응답
#[tokio::test]
async fn test_bad_credentials_are_indistinguishable() {
    let app = TestApp::new();
    app.signup("asha@example.com").await;

    let (wrong_status, wrong_body) = app
        .post_json(
            "/api/patients/signin",
            json!({ "email": "asha@example.com", "password": "Wrong0ne!" }),
        )
        .await;
    let (unknown_status, unknown_body) = app
        .post_json(
            "/api/patients/signin",
            json!({ "email": "nobody@example.com", "password": TEST_PASSWORD }),
        )
        .await;

    assert_eq!(wrong_status, StatusCode::BAD_REQUEST);
    assert_eq!(unknown_status, StatusCode::BAD_REQUEST);
    assert_eq!(wrong_body, unknown_body);
    assert_eq!(wrong_body["error"], json!("Invalid credentials"));
}

/// 테스트: 토큰 없음 / 잘못된 토큰 → 401
#[tokio::test]
async fn test_me_requires_valid_token() {
    let app = TestApp::new();

    let (status, body) = app.get("/api/patients/me", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], json!("Token not provided"));

    let (status, body) = app.get("/api/patients/me", Some("not-a-jwt")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], json!("Invalid or expired token"));
}

/// 테스트: DB 없이 구성한 앱의 헬스 체크
#[tokio::test]
async fn test_health_without_database() {
    let app = TestApp::new();

    let (status, body) = app.get("/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("ok"));
    assert_eq!(body["database"], json!("disabled"));
}

/// 테스트: Bearer 형식이 아닌 헤더 → 401
#[tokio::test]
async fn test_me_rejects_non_bearer_header() {
    let app = TestApp::new();
    let request = axum::http::Request::get("/api/patients/me")
        .header(axum::http::header::AUTHORIZATION, "Basic abc")
        .body(axum::body::Body::empty())
        .unwrap();

    let (status, body) = app.send(request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].as_str().unwrap().contains("Bearer"));
}
