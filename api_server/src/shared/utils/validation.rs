/// 입력값 검증
/// Input validation for patient signup/sign-in and the OTP endpoints
///
/// 규칙:
/// - 이름: 라틴 문자, 공백, 아포스트로피, 하이픈
/// - 휴대폰: 6~9로 시작하는 10자리 숫자
/// - 비밀번호: 8자 이상, 대문자/소문자/숫자/특수문자(@$!%*?&) 각각 1개 이상

use std::sync::LazyLock;
use regex::Regex;

use crate::domains::patient::models::SignupRequest;
use crate::shared::errors::ValidationErrors;

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-zÀ-ÖØ-öø-ÿ\s'-]+$").expect("valid name regex"));
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]{2,}$").expect("valid email regex"));
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[6-9][0-9]{9}$").expect("valid phone regex"));
static PASSWORD_CHARSET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9@$!%*?&]{8,}$").expect("valid password regex"));

const PASSWORD_SPECIALS: &str = "@$!%*?&";

pub const PASSWORD_RULE_MESSAGE: &str = "Password must be at least 8 characters long, include an uppercase letter, a lowercase letter, a number, and a special character.";

/// 이메일 정규화 (앞뒤 공백 제거 + 소문자)
/// Emails are compared case-insensitively everywhere
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn is_valid_name(name: &str) -> bool {
    NAME_RE.is_match(name)
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_RE.is_match(phone)
}

/// regex 크레이트는 lookahead를 지원하지 않으므로 문자 종류는 따로 검사
pub fn is_strong_password(password: &str) -> bool {
    PASSWORD_CHARSET_RE.is_match(password)
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| PASSWORD_SPECIALS.contains(c))
}

/// 6자리 숫자 OTP 형식 확인
pub fn is_valid_otp_code(code: &str) -> bool {
    code.len() == 6 && code.bytes().all(|b| b.is_ascii_digit())
}

fn check_name(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: &str,
    required: &'static str,
    invalid: &'static str,
) {
    let value = value.trim();
    if value.is_empty() {
        errors.insert(field, required);
    } else if !is_valid_name(value) {
        errors.insert(field, invalid);
    }
}

fn check_email(errors: &mut ValidationErrors, email: &str) {
    let email = email.trim();
    if email.is_empty() {
        errors.insert("email", "Email is required!");
    } else if !is_valid_email(email) {
        errors.insert("email", "This is not a valid email format!");
    }
}

/// 회원가입 입력 검증 (모든 필드 에러 수집)
/// Collects every failing field, not just the first
pub fn validate_signup(request: &SignupRequest) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    check_name(
        &mut errors,
        "firstName",
        &request.first_name,
        "First name is required!",
        "First name contains invalid characters!",
    );
    check_name(
        &mut errors,
        "lastName",
        &request.last_name,
        "Last name is required!",
        "Last name contains invalid characters!",
    );
    check_email(&mut errors, &request.email);

    let phone = request.phone.trim();
    if phone.is_empty() {
        errors.insert("phone", "Phone is required!");
    } else if !is_valid_phone(phone) {
        errors.insert("phone", "Not a valid mobile number");
    }

    if request.password.is_empty() {
        errors.insert("password", "Password is required!");
    } else if !is_strong_password(&request.password) {
        errors.insert("password", PASSWORD_RULE_MESSAGE);
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// 로그인 입력 검증 (필수값만 확인)
pub fn validate_signin(email: &str, password: &str) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if email.trim().is_empty() {
        errors.insert("email", "Email is required!");
    }
    if password.is_empty() {
        errors.insert("password", "Password is required!");
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// 이메일 단일 필드 검증; 실패 시 메시지 반환
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    let mut errors = ValidationErrors::new();
    check_email(&mut errors, email);
    match errors.remove("email") {
        Some(message) => Err(message),
        None => Ok(()),
    }
}
