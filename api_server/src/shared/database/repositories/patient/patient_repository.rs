use async_trait::async_trait;
use sqlx::{PgPool, Row};
use sqlx::postgres::PgRow;
use anyhow::{Context, Result};
use thiserror::Error;
use crate::domains::patient::models::patient::{Patient, PatientCreate};

/// 이메일 unique 제약 위반 (동시 회원가입 경합)
/// Raised by `create` when the email is already taken at insert time
#[derive(Debug, Error)]
#[error("email already registered: {email}")]
pub struct DuplicateEmail {
    pub email: String,
}

/// 환자 저장소 추상화
/// Persistence operations for patients
#[async_trait]
pub trait PatientRepository: Send + Sync {
    /// 환자 생성; 이메일 중복 시 `DuplicateEmail` 에러
    async fn create(&self, data: PatientCreate) -> Result<Patient>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Patient>>;

    async fn find_by_id(&self, id: u64) -> Result<Option<Patient>>;

    /// 인증 플래그 설정 후 갱신된 환자 반환 (없으면 None)
    /// Set `is_verified = true` and return the updated row
    async fn mark_verified(&self, email: &str) -> Result<Option<Patient>>;
}

const PATIENT_COLUMNS: &str =
    "id, email, password_hash, first_name, last_name, phone, is_verified, created_at, updated_at";

pub struct PgPatientRepository {
    pool: PgPool,
}

impl PgPatientRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn map_row(row: &PgRow) -> Patient {
        Patient {
            id: row.get::<i64, _>("id") as u64, // DB는 BIGINT = i64
            email: row.get("email"),
            password_hash: row.get("password_hash"),
            first_name: row.get("first_name"),
            last_name: row.get("last_name"),
            phone: row.get("phone"),
            is_verified: row.get("is_verified"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        }
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().as_deref() == Some("23505"),
        _ => false,
    }
}

#[async_trait]
impl PatientRepository for PgPatientRepository {
    async fn create(&self, data: PatientCreate) -> Result<Patient> {
        let query = format!(
            r#"
            INSERT INTO patients (email, password_hash, first_name, last_name, phone, is_verified, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, FALSE, NOW(), NOW())
            RETURNING {}
            "#,
            PATIENT_COLUMNS
        );

        let result = sqlx::query(&query)
            .bind(&data.email)
            .bind(&data.password_hash)
            .bind(&data.first_name)
            .bind(&data.last_name)
            .bind(&data.phone)
            .fetch_one(&self.pool)
            .await;

        match result {
            Ok(row) => Ok(Self::map_row(&row)),
            Err(e) if is_unique_violation(&e) => Err(DuplicateEmail { email: data.email }.into()),
            Err(e) => Err(e).context("Failed to create patient"),
        }
    }

    // 이메일로 환자 조회 (로그인/중복 확인용)
    // Get patient by email (for login and uniqueness checks)
    async fn find_by_email(&self, email: &str) -> Result<Option<Patient>> {
        let query = format!("SELECT {} FROM patients WHERE email = $1", PATIENT_COLUMNS);

        let row = sqlx::query(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch patient by email")?;

        Ok(row.as_ref().map(Self::map_row))
    }

    async fn find_by_id(&self, id: u64) -> Result<Option<Patient>> {
        let query = format!("SELECT {} FROM patients WHERE id = $1", PATIENT_COLUMNS);

        let row = sqlx::query(&query)
            .bind(id as i64)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch patient by id")?;

        Ok(row.as_ref().map(Self::map_row))
    }

    async fn mark_verified(&self, email: &str) -> Result<Option<Patient>> {
        let query = format!(
            r#"
            UPDATE patients
            SET is_verified = TRUE, updated_at = NOW()
            WHERE email = $1
            RETURNING {}
            "#,
            PATIENT_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to mark patient as verified")?;

        Ok(row.as_ref().map(Self::map_row))
    }
}
