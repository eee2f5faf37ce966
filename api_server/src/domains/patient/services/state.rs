// Patient domain state
// 환자 도메인 상태
use std::sync::Arc;
use crate::shared::database::PatientRepository;
use crate::domains::patient::services::{JwtService, PatientService};

/// Patient domain state
/// 환자 도메인에서 필요한 서비스들을 포함하는 상태
#[derive(Clone)]
pub struct PatientState {
    pub patient_service: PatientService,
    pub jwt_service: JwtService,
}

impl PatientState {
    pub fn new(patients: Arc<dyn PatientRepository>, jwt_service: JwtService) -> Self {
        Self {
            patient_service: PatientService::new(patients, jwt_service.clone()),
            jwt_service,
        }
    }
}
