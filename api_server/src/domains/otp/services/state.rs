// OTP domain state
// OTP 도메인 상태
use std::sync::Arc;
use crate::domains::otp::services::{OtpCleanupScheduler, OtpService};
use crate::shared::clients::EmailSender;
use crate::shared::config::OtpConfig;
use crate::shared::database::{OtpRepository, PatientRepository};

/// OTP domain state
/// OTP 발송/검증 서비스와 만료 OTP 정리 스케줄러
#[derive(Clone)]
pub struct OtpState {
    pub otp_service: OtpService,
    pub cleanup_scheduler: OtpCleanupScheduler,
}

impl OtpState {
    pub fn new(
        otps: Arc<dyn OtpRepository>,
        patients: Arc<dyn PatientRepository>,
        mailer: Arc<dyn EmailSender>,
        config: OtpConfig,
    ) -> Self {
        let period = config.cleanup_interval();
        let otp_service = OtpService::new(otps, patients, mailer, config);
        let cleanup_scheduler = OtpCleanupScheduler::new(otp_service.clone(), period);

        Self { otp_service, cleanup_scheduler }
    }
}
