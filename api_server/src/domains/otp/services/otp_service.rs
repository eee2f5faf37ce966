use std::sync::Arc;
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use sha2::{Digest, Sha256};

use crate::domains::otp::models::{OtpCreate, OtpRecord};
use crate::domains::patient::models::Patient;
use crate::shared::clients::EmailSender;
use crate::shared::config::OtpConfig;
use crate::shared::database::{OtpRepository, PatientRepository};
use crate::shared::errors::OtpError;
use crate::shared::utils::validation::{is_valid_otp_code, normalize_email, validate_email};

const OTP_DIGITS: u32 = 6;

/// 6자리 OTP 생성 (000000 ~ 999999 균등 분포)
/// Uniformly random six-digit code, zero padded
pub fn generate_otp() -> String {
    let code = rand::thread_rng().gen_range(0..10u32.pow(OTP_DIGITS));
    format!("{:0width$}", code, width = OTP_DIGITS as usize)
}

/// OTP 해싱 (DB 저장용)
/// Hash an OTP for storage
pub fn hash_otp(code: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(code.as_bytes());
    format!("{:x}", hasher.finalize())
}

// 이메일 OTP 서비스
// OtpService: issues verification codes and checks them
#[derive(Clone)]
pub struct OtpService {
    otps: Arc<dyn OtpRepository>,
    patients: Arc<dyn PatientRepository>,
    mailer: Arc<dyn EmailSender>,
    config: OtpConfig,
}

impl OtpService {
    pub fn new(
        otps: Arc<dyn OtpRepository>,
        patients: Arc<dyn PatientRepository>,
        mailer: Arc<dyn EmailSender>,
        config: OtpConfig,
    ) -> Self {
        Self { otps, patients, mailer, config }
    }

    /// 인증 메일 발송
    /// Issue a fresh OTP for `email` and mail it
    ///
    /// 처리 흐름:
    /// 1. 이메일 검증 및 정규화
    /// 2. 환자 존재 + 미인증 상태 확인
    /// 3. OTP 생성 후 해시 저장 (쿨다운 확인과 교체는 저장소에서 한 번에 처리)
    /// 4. 메일 발송 (실패 시 저장한 OTP 삭제)
    pub async fn send_verification_email(&self, email: &str) -> Result<(), OtpError> {
        validate_email(email).map_err(OtpError::InvalidEmail)?;
        let email = normalize_email(email);

        let patient = self
            .patients
            .find_by_email(&email)
            .await
            .map_err(|e| OtpError::DatabaseError(format!("Failed to fetch patient: {}", e)))?
            .ok_or_else(|| OtpError::PatientNotFound { email: email.clone() })?;

        if patient.is_verified {
            return Err(OtpError::AlreadyVerified);
        }

        let now = Utc::now();
        let cooldown = self.resend_cooldown();
        let code = generate_otp();
        let otp_hash = hash_otp(&code);

        let issued = self
            .otps
            .issue(
                OtpCreate {
                    email: email.clone(),
                    otp_hash: otp_hash.clone(),
                    expires_at: now + self.ttl(),
                    created_at: now,
                },
                now - cooldown,
            )
            .await
            .map_err(|e| OtpError::DatabaseError(format!("Failed to store OTP: {}", e)))?;

        if issued.is_none() {
            // 남은 대기 시간은 안내용
            let retry_after_secs = match self.find_otp(&email).await? {
                Some(existing) => (existing.created_at + cooldown - now).num_seconds().max(1) as u64,
                None => 1,
            };
            return Err(OtpError::ResendTooSoon { retry_after_secs });
        }

        let (subject, html_body, text_body) = self.compose_email(&patient, &code);
        if let Err(e) = self
            .mailer
            .send_email(&email, &subject, &html_body, &text_body)
            .await
        {
            // 발송 실패한 OTP는 사용할 수 없으므로 제거
            if let Err(cleanup) = self.otps.delete_matching(&email, &otp_hash).await {
                tracing::warn!(error = %cleanup, "failed to discard undelivered OTP");
            }
            return Err(OtpError::MailDelivery(e.to_string()));
        }

        tracing::info!(patient_id = patient.id, "verification OTP sent");
        Ok(())
    }

    /// OTP 검증 후 환자 인증 처리
    /// Check `otp` for `email`; on success flips the verification flag
    ///
    /// 시도 횟수는 비교 전에 원자적으로 예약되므로 동시 요청도 한도를 넘지 못함
    pub async fn verify_email(&self, email: &str, otp: &str) -> Result<Patient, OtpError> {
        validate_email(email).map_err(OtpError::InvalidEmail)?;
        let email = normalize_email(email);
        let otp = otp.trim();

        if !is_valid_otp_code(otp) {
            return Err(OtpError::InvalidOtp);
        }

        let now = Utc::now();
        let reserved = self
            .otps
            .reserve_attempt(&email, self.config.max_attempts, now)
            .await
            .map_err(|e| OtpError::DatabaseError(format!("Failed to reserve OTP attempt: {}", e)))?;

        let Some(record) = reserved else {
            return Err(self.reject_unusable(&email, now).await?);
        };

        if hash_otp(otp) != record.otp_hash {
            tracing::info!(attempts = record.attempts, "invalid OTP submitted");
            return Err(OtpError::InvalidOtp);
        }

        let patient = self
            .patients
            .mark_verified(&email)
            .await
            .map_err(|e| OtpError::DatabaseError(format!("Failed to verify patient: {}", e)))?
            .ok_or_else(|| OtpError::PatientNotFound { email: email.clone() })?;

        // 같은 코드로 동시에 들어온 요청이 먼저 지웠을 수 있음
        self.discard(&email, &record.otp_hash).await?;

        tracing::info!(patient_id = patient.id, "patient email verified");
        Ok(patient)
    }

    /// 만료된 OTP 정리
    /// Remove every expired OTP; returns how many were deleted
    pub async fn purge_expired(&self) -> Result<u64, OtpError> {
        self.otps
            .delete_expired(Utc::now())
            .await
            .map_err(|e| OtpError::DatabaseError(format!("Failed to purge expired OTPs: {}", e)))
    }

    async fn find_otp(&self, email: &str) -> Result<Option<OtpRecord>, OtpError> {
        self.otps
            .find_by_email(email)
            .await
            .map_err(|e| OtpError::DatabaseError(format!("Failed to find OTP: {}", e)))
    }

    async fn discard(&self, email: &str, otp_hash: &str) -> Result<bool, OtpError> {
        self.otps
            .delete_matching(email, otp_hash)
            .await
            .map_err(|e| OtpError::DatabaseError(format!("Failed to delete OTP: {}", e)))
    }

    /// 시도 예약 실패 사유 판별: 없음 / 만료 / 한도 초과
    async fn reject_unusable(&self, email: &str, now: DateTime<Utc>) -> Result<OtpError, OtpError> {
        let Some(record) = self.find_otp(email).await? else {
            return Ok(OtpError::InvalidOtp);
        };

        let rejection = if record.is_expired(now) {
            OtpError::OtpExpired
        } else if record.attempts >= self.config.max_attempts {
            OtpError::TooManyAttempts
        } else {
            // 그 사이 새 OTP가 발급된 경우
            return Ok(OtpError::InvalidOtp);
        };

        self.discard(email, &record.otp_hash).await?;
        Ok(rejection)
    }

    fn ttl(&self) -> Duration {
        Duration::seconds(self.config.ttl().as_secs() as i64)
    }

    fn resend_cooldown(&self) -> Duration {
        Duration::seconds(self.config.resend_cooldown().as_secs() as i64)
    }

    fn compose_email(&self, patient: &Patient, code: &str) -> (String, String, String) {
        let minutes = (self.config.ttl_secs / 60).max(1);
        let subject = "Verify your email address".to_string();
        let text_body = format!(
            "Hi {},\n\nYour verification code is {}. It expires in {} minutes.\n\nIf you did not sign up, you can ignore this email.",
            patient.first_name, code, minutes
        );
        let html_body = format!(
            "<p>Hi {},</p><p>Your verification code is <strong>{}</strong>. It expires in {} minutes.</p><p>If you did not sign up, you can ignore this email.</p>",
            patient.first_name, code, minutes
        );
        (subject, html_body, text_body)
    }
}
