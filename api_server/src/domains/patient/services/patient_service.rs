use std::sync::Arc;
use crate::shared::database::{DuplicateEmail, PatientRepository};
use crate::domains::patient::models::{Patient, PatientCreate, SignupRequest, SigninRequest};
use crate::domains::patient::services::JwtService;
use crate::domains::patient::services::password::{hash_password, verify_password};
use crate::shared::errors::PatientError;
use crate::shared::utils::validation::{normalize_email, validate_signin, validate_signup};

// 환자 인증 서비스
// PatientService: signup / sign-in business logic
#[derive(Clone)]
pub struct PatientService {
    patients: Arc<dyn PatientRepository>,
    jwt_service: JwtService,
}

impl PatientService {
    pub fn new(patients: Arc<dyn PatientRepository>, jwt_service: JwtService) -> Self {
        Self { patients, jwt_service }
    }

    // 회원가입 (비즈니스 로직)
    pub async fn signup(&self, request: SignupRequest) -> Result<Patient, PatientError> {
        // 1. 입력값 검증
        validate_signup(&request).map_err(PatientError::Validation)?;
        let email = normalize_email(&request.email);

        // 2. 이메일 중복 확인
        let existing = self
            .patients
            .find_by_email(&email)
            .await
            .map_err(|e| PatientError::DatabaseError(format!("Failed to check email existence: {}", e)))?;

        if existing.is_some() {
            return Err(PatientError::EmailAlreadyExists { email });
        }

        // 3. 비밀번호 해싱
        let password_hash = hash_password(&request.password)?;

        // 4. 환자 생성 (동시 가입 경합 시 unique 제약으로 걸러짐)
        let patient = self
            .patients
            .create(PatientCreate {
                email,
                password_hash,
                first_name: request.first_name.trim().to_string(),
                last_name: request.last_name.trim().to_string(),
                phone: request.phone.trim().to_string(),
            })
            .await
            .map_err(|e| match e.downcast::<DuplicateEmail>() {
                Ok(dup) => PatientError::EmailAlreadyExists { email: dup.email },
                Err(e) => PatientError::DatabaseError(format!("Failed to create patient: {}", e)),
            })?;

        tracing::info!(patient_id = patient.id, "patient signed up");
        Ok(patient)
    }

    // 로그인 (비즈니스 로직)
    // Returns: (Patient, access_token)
    pub async fn signin(&self, request: SigninRequest) -> Result<(Patient, String), PatientError> {
        validate_signin(&request.email, &request.password).map_err(PatientError::Validation)?;
        let email = normalize_email(&request.email);

        // 1. 이메일로 환자 조회
        let patient = self
            .patients
            .find_by_email(&email)
            .await
            .map_err(|e| PatientError::DatabaseError(format!("Failed to fetch patient: {}", e)))?
            .ok_or(PatientError::InvalidCredentials)?;

        // 2. 비밀번호 검증
        verify_password(&request.password, &patient.password_hash)?;

        // 3. Access Token 발급
        let token = self
            .jwt_service
            .generate_access_token(patient.id, patient.email.clone())?;

        tracing::info!(patient_id = patient.id, "patient signed in");
        Ok((patient, token))
    }

    pub async fn get_patient(&self, patient_id: u64) -> Result<Patient, PatientError> {
        self.patients
            .find_by_id(patient_id)
            .await
            .map_err(|e| PatientError::DatabaseError(format!("Failed to fetch patient: {}", e)))?
            .ok_or(PatientError::PatientNotFound { id: patient_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::database::InMemoryPatientRepository;

    fn service() -> (PatientService, Arc<InMemoryPatientRepository>) {
        let repo = Arc::new(InMemoryPatientRepository::new());
        let service = PatientService::new(repo.clone(), JwtService::new("test-secret", 1));
        (service, repo)
    }

    fn signup_request(email: &str) -> SignupRequest {
        SignupRequest {
            first_name: " Asha ".to_string(),
            last_name: "Rao".to_string(),
            email: email.to_string(),
            phone: "9876543210".to_string(),
            password: "Passw0rd!".to_string(),
        }
    }

    #[tokio::test]
    async fn test_signup_stores_hashed_password_and_normalized_fields() {
        let (service, repo) = service();

        let patient = service.signup(signup_request("  Asha@Example.com")).await.unwrap();
        assert_eq!(patient.email, "asha@example.com");
        assert_eq!(patient.first_name, "Asha");
        assert!(!patient.is_verified);
        assert_ne!(patient.password_hash, "Passw0rd!");
        assert!(verify_password("Passw0rd!", &patient.password_hash).is_ok());
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn test_signup_rejects_duplicate_email_case_insensitively() {
        let (service, repo) = service();
        service.signup(signup_request("asha@example.com")).await.unwrap();

        let err = service.signup(signup_request("ASHA@example.com")).await.unwrap_err();
        assert!(matches!(err, PatientError::EmailAlreadyExists { .. }));
        assert_eq!(err.to_string(), "User already exists with this email");
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn test_signup_validation_failure_touches_nothing() {
        let (service, repo) = service();
        let mut request = signup_request("asha@example.com");
        request.phone = "12345".to_string();

        let err = service.signup(request).await.unwrap_err();
        match err {
            PatientError::Validation(details) => {
                assert_eq!(details.get("phone"), Some(&"Not a valid mobile number"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn test_signin_issues_verifiable_token() {
        let (service, _) = service();
        let created = service.signup(signup_request("asha@example.com")).await.unwrap();

        let (patient, token) = service
            .signin(SigninRequest {
                email: "Asha@Example.com".to_string(),
                password: "Passw0rd!".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(patient.id, created.id);
        let claims = JwtService::new("test-secret", 1).verify_access_token(&token).unwrap();
        assert_eq!(claims.patient_id, created.id);
        assert_eq!(claims.email, "asha@example.com");
    }

    #[tokio::test]
    async fn test_signin_wrong_password_and_unknown_email_look_the_same() {
        let (service, _) = service();
        service.signup(signup_request("asha@example.com")).await.unwrap();

        let wrong_password = service
            .signin(SigninRequest {
                email: "asha@example.com".to_string(),
                password: "Wrong0ne!".to_string(),
            })
            .await
            .unwrap_err();
        let unknown = service
            .signin(SigninRequest {
                email: "nobody@example.com".to_string(),
                password: "Passw0rd!".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(wrong_password, PatientError::InvalidCredentials));
        assert!(matches!(unknown, PatientError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_get_patient_missing() {
        let (service, _) = service();
        assert!(matches!(
            service.get_patient(99).await,
            Err(PatientError::PatientNotFound { id: 99 })
        ));
    }
}
