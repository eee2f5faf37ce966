use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use crate::domains::otp::services::OtpService;

/// 만료 OTP 정리 스케줄러
/// Expired OTP Cleanup Scheduler
///
/// 역할:
/// - 주기적으로 만료된 OTP 레코드 삭제
/// - 런타임에 활성화/비활성화 가능
///
/// 실패는 로그만 남기고 다음 주기에 다시 시도
#[derive(Clone)]
pub struct OtpCleanupScheduler {
    otp_service: OtpService,
    period: Duration,
    enabled: Arc<AtomicBool>,
}

impl OtpCleanupScheduler {
    pub fn new(otp_service: OtpService, period: Duration) -> Self {
        Self {
            otp_service,
            period,
            enabled: Arc::new(AtomicBool::new(true)), // 기본값: 활성화
        }
    }

    /// 스케줄러 시작
    /// Spawn the background task; the first sweep runs immediately
    pub fn start(&self) -> JoinHandle<()> {
        let otp_service = self.otp_service.clone();
        let enabled = self.enabled.clone();
        let period = self.period;

        tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;

                if !enabled.load(Ordering::Relaxed) {
                    continue;
                }

                match otp_service.purge_expired().await {
                    Ok(0) => {}
                    Ok(removed) => tracing::info!(removed, "purged expired OTPs"),
                    Err(e) => tracing::warn!(error = %e, "OTP cleanup failed"),
                }
            }
        })
    }

    pub fn enable(&self) {
        self.enabled.store(true, Ordering::Relaxed);
    }

    pub fn disable(&self) {
        self.enabled.store(false, Ordering::Relaxed);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use crate::domains::otp::models::OtpRecord;
    use crate::domains::otp::services::hash_otp;
    use crate::shared::clients::LogEmailSender;
    use crate::shared::config::OtpConfig;
    use crate::shared::database::{InMemoryOtpRepository, InMemoryPatientRepository, OtpRepository};

    fn expired_record(email: &str) -> OtpRecord {
        let now = Utc::now();
        OtpRecord {
            email: email.to_string(),
            otp_hash: hash_otp("123456"),
            attempts: 0,
            expires_at: now - chrono::Duration::minutes(1),
            created_at: now - chrono::Duration::minutes(11),
        }
    }

    fn scheduler(otps: Arc<InMemoryOtpRepository>) -> OtpCleanupScheduler {
        let service = OtpService::new(
            otps,
            Arc::new(InMemoryPatientRepository::new()),
            Arc::new(LogEmailSender),
            OtpConfig::default(),
        );
        OtpCleanupScheduler::new(service, Duration::from_millis(20))
    }

    #[tokio::test]
    async fn test_scheduler_purges_expired_otps() {
        let otps = Arc::new(InMemoryOtpRepository::new());
        otps.insert_raw(expired_record("old@example.com"));

        let scheduler = scheduler(otps.clone());
        let handle = scheduler.start();
        tokio::time::sleep(Duration::from_millis(100)).await;
        handle.abort();

        assert!(otps.find_by_email("old@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_disabled_scheduler_leaves_rows() {
        let otps = Arc::new(InMemoryOtpRepository::new());
        otps.insert_raw(expired_record("old@example.com"));

        let scheduler = scheduler(otps.clone());
        scheduler.disable();
        assert!(!scheduler.is_enabled());
        let handle = scheduler.start();
        tokio::time::sleep(Duration::from_millis(100)).await;
        handle.abort();

        assert_eq!(otps.len(), 1);
        scheduler.enable();
        assert!(scheduler.is_enabled());
    }
}
