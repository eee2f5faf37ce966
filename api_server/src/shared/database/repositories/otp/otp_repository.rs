use async_trait::async_trait;
use sqlx::{PgPool, Row};
use sqlx::postgres::PgRow;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use crate::domains::otp::models::otp::{OtpCreate, OtpRecord};

/// OTP 저장소 추상화 (이메일당 하나의 OTP)
/// One live OTP per email. Check-and-write steps are single atomic operations
/// so concurrent requests cannot bypass the cooldown or the attempt limit.
#[async_trait]
pub trait OtpRepository: Send + Sync {
    /// OTP 발급: 기존 OTP가 `resend_cutoff` 이전에 발급됐거나 만료된 경우에만 교체
    /// Insert, or replace the live OTP if it was created at or before
    /// `resend_cutoff` or has expired. Returns `None` when the existing OTP
    /// is still inside its resend cooldown.
    async fn issue(&self, data: OtpCreate, resend_cutoff: DateTime<Utc>) -> Result<Option<OtpRecord>>;

    async fn find_by_email(&self, email: &str) -> Result<Option<OtpRecord>>;

    /// 검증 시도 1회 예약 (attempts < max 이고 미만료일 때만 증가)
    /// Atomically count one verification attempt. Returns the record with the
    /// incremented counter, or `None` if there is no usable OTP.
    async fn reserve_attempt(
        &self,
        email: &str,
        max_attempts: u32,
        now: DateTime<Utc>,
    ) -> Result<Option<OtpRecord>>;

    /// 해시가 일치하는 OTP만 삭제; 삭제 여부 반환
    /// Delete the OTP only if it still carries `otp_hash`
    async fn delete_matching(&self, email: &str, otp_hash: &str) -> Result<bool>;

    /// 만료된 OTP 삭제 (정리 작업)
    /// Delete OTPs that expired at or before `now`; returns rows removed
    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64>;
}

const OTP_COLUMNS: &str = "email, otp_hash, attempts, expires_at, created_at";

pub struct PgOtpRepository {
    pool: PgPool,
}

impl PgOtpRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn map_row(row: &PgRow) -> OtpRecord {
        OtpRecord {
            email: row.get("email"),
            otp_hash: row.get("otp_hash"),
            attempts: row.get::<i32, _>("attempts").max(0) as u32,
            expires_at: row.get("expires_at"),
            created_at: row.get("created_at"),
        }
    }
}

#[async_trait]
impl OtpRepository for PgOtpRepository {
    async fn issue(&self, data: OtpCreate, resend_cutoff: DateTime<Utc>) -> Result<Option<OtpRecord>> {
        // 조건부 UPDATE가 걸러지면 RETURNING 결과 없음
        let query = format!(
            r#"
            INSERT INTO email_otps (email, otp_hash, attempts, expires_at, created_at)
            VALUES ($1, $2, 0, $3, $4)
            ON CONFLICT (email) DO UPDATE
            SET otp_hash = EXCLUDED.otp_hash,
                attempts = 0,
                expires_at = EXCLUDED.expires_at,
                created_at = EXCLUDED.created_at
            WHERE email_otps.created_at <= $5
               OR email_otps.expires_at <= EXCLUDED.created_at
            RETURNING {}
            "#,
            OTP_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(&data.email)
            .bind(&data.otp_hash)
            .bind(data.expires_at)
            .bind(data.created_at)
            .bind(resend_cutoff)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to store OTP")?;

        Ok(row.as_ref().map(Self::map_row))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<OtpRecord>> {
        let query = format!("SELECT {} FROM email_otps WHERE email = $1", OTP_COLUMNS);

        let row = sqlx::query(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to find OTP")?;

        Ok(row.as_ref().map(Self::map_row))
    }

    async fn reserve_attempt(
        &self,
        email: &str,
        max_attempts: u32,
        now: DateTime<Utc>,
    ) -> Result<Option<OtpRecord>> {
        let query = format!(
            r#"
            UPDATE email_otps
            SET attempts = attempts + 1
            WHERE email = $1 AND attempts < $2 AND expires_at > $3
            RETURNING {}
            "#,
            OTP_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(email)
            .bind(i32::try_from(max_attempts).unwrap_or(i32::MAX))
            .bind(now)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to reserve OTP attempt")?;

        Ok(row.as_ref().map(Self::map_row))
    }

    async fn delete_matching(&self, email: &str, otp_hash: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM email_otps WHERE email = $1 AND otp_hash = $2")
            .bind(email)
            .bind(otp_hash)
            .execute(&self.pool)
            .await
            .context("Failed to delete OTP")?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64> {
        let result = sqlx::query("DELETE FROM email_otps WHERE expires_at <= $1")
            .bind(now)
            .execute(&self.pool)
            .await
            .context("Failed to delete expired OTPs")?;

        Ok(result.rows_affected())
    }
}
