use std::sync::Arc;
use anyhow::{Context, Result};
use crate::shared::config::{AppConfig, OtpConfig};
use crate::shared::clients::{build_email_sender, EmailSender};
use crate::shared::database::{
    Database, OtpRepository, PatientRepository, PgOtpRepository, PgPatientRepository,
};
use crate::domains::patient::services::state::PatientState;
use crate::domains::patient::services::JwtService;
use crate::domains::otp::services::state::OtpState;

/// Application state (combines all domain states)
/// 애플리케이션 상태 (모든 도메인 상태를 조합)
///
/// 각 도메인의 State를 조합하여 전체 애플리케이션 상태를 관리
#[derive(Clone)]
pub struct AppState {
    /// 데이터베이스 연결 (헬스 체크용)
    /// None when running on in-memory repositories
    pub db: Option<Database>,
    pub patient_state: PatientState,
    pub otp_state: OtpState,
}

impl AppState {
    /// Create AppState with database
    /// 모든 도메인 State를 초기화하고 조합
    pub fn new(db: Database, config: &AppConfig) -> Result<Self> {
        // 1. 저장소 생성
        let patients: Arc<dyn PatientRepository> =
            Arc::new(PgPatientRepository::new(db.pool().clone()));
        let otps: Arc<dyn OtpRepository> = Arc::new(PgOtpRepository::new(db.pool().clone()));

        // 2. 공유 서비스 생성 (JWT, 메일)
        let jwt_service = JwtService::new(&config.jwt.secret, config.jwt.expiration_hours);
        let mailer = build_email_sender(&config.email).context("Failed to build email sender")?;

        // 3. AppState 조합
        let mut state = Self::with_parts(patients, otps, mailer, jwt_service, config.otp.clone());
        state.db = Some(db);
        Ok(state)
    }

    /// 저장소와 메일 sender를 직접 주입
    /// Assemble state from explicit parts (used by tests and alternative backends)
    pub fn with_parts(
        patients: Arc<dyn PatientRepository>,
        otps: Arc<dyn OtpRepository>,
        mailer: Arc<dyn EmailSender>,
        jwt_service: JwtService,
        otp_config: OtpConfig,
    ) -> Self {
        let patient_state = PatientState::new(patients.clone(), jwt_service);
        let otp_state = OtpState::new(otps, patients, mailer, otp_config);

        Self {
            db: None,
            patient_state,
            otp_state,
        }
    }
}
