/// 공유 유틸리티 모듈
/// Shared Utilities Module
///
/// 역할:
/// - 입력값 검증 (이름, 이메일, 휴대폰, 비밀번호, OTP 형식)
pub mod validation;

pub use validation::*;
