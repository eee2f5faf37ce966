//! 메모리 기반 저장소 (테스트 및 로컬 실행용)
//! In-memory repositories backing tests and database-less runs.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use async_trait::async_trait;
use anyhow::Result;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use crate::domains::otp::models::otp::{OtpCreate, OtpRecord};
use crate::domains::patient::models::patient::{Patient, PatientCreate};
use super::otp::OtpRepository;
use super::patient::{DuplicateEmail, PatientRepository};

pub struct InMemoryPatientRepository {
    next_id: AtomicU64,
    patients: Mutex<HashMap<String, Patient>>, // key: email
}

impl Default for InMemoryPatientRepository {
    fn default() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            patients: Mutex::new(HashMap::new()),
        }
    }
}

impl InMemoryPatientRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.patients.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl PatientRepository for InMemoryPatientRepository {
    async fn create(&self, data: PatientCreate) -> Result<Patient> {
        let mut patients = self.patients.lock();
        if patients.contains_key(&data.email) {
            return Err(DuplicateEmail { email: data.email }.into());
        }

        let now = Utc::now();
        let patient = Patient {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            email: data.email,
            password_hash: data.password_hash,
            first_name: data.first_name,
            last_name: data.last_name,
            phone: data.phone,
            is_verified: false,
            created_at: now,
            updated_at: now,
        };
        patients.insert(patient.email.clone(), patient.clone());
        Ok(patient)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Patient>> {
        Ok(self.patients.lock().get(email).cloned())
    }

    async fn find_by_id(&self, id: u64) -> Result<Option<Patient>> {
        Ok(self.patients.lock().values().find(|p| p.id == id).cloned())
    }

    async fn mark_verified(&self, email: &str) -> Result<Option<Patient>> {
        let mut patients = self.patients.lock();
        Ok(patients.get_mut(email).map(|patient| {
            patient.is_verified = true;
            patient.updated_at = Utc::now();
            patient.clone()
        }))
    }
}

#[derive(Default)]
pub struct InMemoryOtpRepository {
    otps: Mutex<HashMap<String, OtpRecord>>, // key: email
}

impl InMemoryOtpRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 테스트용: 레코드를 그대로 삽입 (만료 시간 조작 등)
    /// Store a record verbatim, bypassing `issue`'s cooldown check
    pub fn insert_raw(&self, record: OtpRecord) {
        self.otps.lock().insert(record.email.clone(), record);
    }

    pub fn len(&self) -> usize {
        self.otps.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl OtpRepository for InMemoryOtpRepository {
    async fn issue(&self, data: OtpCreate, resend_cutoff: DateTime<Utc>) -> Result<Option<OtpRecord>> {
        // 조회와 교체를 같은 lock 안에서 처리
        let mut otps = self.otps.lock();
        if let Some(existing) = otps.get(&data.email) {
            if existing.created_at > resend_cutoff && !existing.is_expired(data.created_at) {
                return Ok(None);
            }
        }

        let record = OtpRecord {
            email: data.email,
            otp_hash: data.otp_hash,
            attempts: 0,
            expires_at: data.expires_at,
            created_at: data.created_at,
        };
        otps.insert(record.email.clone(), record.clone());
        Ok(Some(record))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<OtpRecord>> {
        Ok(self.otps.lock().get(email).cloned())
    }

    async fn reserve_attempt(
        &self,
        email: &str,
        max_attempts: u32,
        now: DateTime<Utc>,
    ) -> Result<Option<OtpRecord>> {
        let mut otps = self.otps.lock();
        Ok(otps
            .get_mut(email)
            .filter(|record| record.attempts < max_attempts && !record.is_expired(now))
            .map(|record| {
                record.attempts += 1;
                record.clone()
            }))
    }

    async fn delete_matching(&self, email: &str, otp_hash: &str) -> Result<bool> {
        let mut otps = self.otps.lock();
        if otps.get(email).is_some_and(|record| record.otp_hash == otp_hash) {
            otps.remove(email);
            return Ok(true);
        }
        Ok(false)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64> {
        let mut otps = self.otps.lock();
        let before = otps.len();
        otps.retain(|_, record| !record.is_expired(now));
        Ok((before - otps.len()) as u64)
    }
}
