// 애플리케이션 설정
// Application configuration loaded from environment variables (.env supported)
use anyhow::{anyhow, Context, Result};
use std::str::FromStr;
use std::time::Duration;

const DEV_JWT_SECRET: &str = "your-secret-key-change-in-production";

/// 설정 상한값 (시간 계산 overflow 방지)
pub const MAX_JWT_EXPIRATION_HOURS: i64 = 24 * 365;
pub const MAX_OTP_TTL_SECS: u64 = 24 * 60 * 60;
pub const MAX_OTP_RESEND_COOLDOWN_SECS: u64 = 60 * 60;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub otp: OtpConfig,
    pub email: EmailConfig,
    pub cors_allowed_origin: String,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration_hours: i64,
}

/// OTP 정책
/// OTP issuance and verification policy
#[derive(Debug, Clone)]
pub struct OtpConfig {
    pub ttl_secs: u64,
    pub max_attempts: u32,
    pub resend_cooldown_secs: u64,
    pub cleanup_interval_secs: u64,
}

#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// None이면 로그 출력용 sender 사용
    pub api_url: Option<String>,
    pub api_token: Option<String>,
    pub sender: String,
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" | "compact" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(anyhow!("LOG_FORMAT must be 'pretty' or 'json', got '{}'", other)),
        }
    }
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 600,
            max_attempts: 5,
            resend_cooldown_secs: 30,
            cleanup_interval_secs: 300,
        }
    }
}

impl OtpConfig {
    /// `MAX_OTP_TTL_SECS`로 제한
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs.min(MAX_OTP_TTL_SECS))
    }

    /// `MAX_OTP_RESEND_COOLDOWN_SECS`로 제한
    pub fn resend_cooldown(&self) -> Duration {
        Duration::from_secs(self.resend_cooldown_secs.min(MAX_OTP_RESEND_COOLDOWN_SECS))
    }

    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_secs)
    }
}

impl AppConfig {
    /// .env 파일을 읽은 뒤 환경 변수로부터 설정 생성
    /// Load `.env` (if present), read the environment and validate the result
    pub fn load() -> Result<Self> {
        // .env 파일이 없어도 에러 아님
        let _ = dotenvy::dotenv();
        let mut cfg = Self::from_env()?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn from_env() -> Result<Self> {
        let otp_defaults = OtpConfig::default();

        Ok(Self {
            server: ServerConfig {
                host: env_or("HOST", "0.0.0.0"),
                port: env_parse("PORT", 8080)?,
            },
            database: DatabaseConfig {
                url: env_or("DATABASE_URL", ""),
                max_connections: env_parse("DATABASE_MAX_CONNECTIONS", 10)?,
                acquire_timeout_secs: env_parse("DATABASE_ACQUIRE_TIMEOUT_SECS", 30)?,
            },
            jwt: JwtConfig {
                secret: env_or("JWT_SECRET", ""),
                expiration_hours: env_parse("JWT_EXPIRATION_HOURS", 1)?,
            },
            otp: OtpConfig {
                ttl_secs: env_parse("OTP_TTL_SECS", otp_defaults.ttl_secs)?,
                max_attempts: env_parse("OTP_MAX_ATTEMPTS", otp_defaults.max_attempts)?,
                resend_cooldown_secs: env_parse(
                    "OTP_RESEND_COOLDOWN_SECS",
                    otp_defaults.resend_cooldown_secs,
                )?,
                cleanup_interval_secs: env_parse(
                    "OTP_CLEANUP_INTERVAL_SECS",
                    otp_defaults.cleanup_interval_secs,
                )?,
            },
            email: EmailConfig {
                api_url: env_opt("EMAIL_API_URL"),
                api_token: env_opt("EMAIL_API_TOKEN"),
                sender: env_or("EMAIL_SENDER", "no-reply@localhost"),
                timeout_ms: env_parse("EMAIL_TIMEOUT_MS", 10_000)?,
            },
            cors_allowed_origin: env_or("CORS_ALLOWED_ORIGIN", "http://localhost:5173"),
            log_format: env_parse("LOG_FORMAT", LogFormat::Pretty)?,
        })
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        if self.server.host.trim().is_empty() {
            self.server.host = "0.0.0.0".to_string();
        }
        if self.server.port == 0 {
            return Err(anyhow!("PORT must be in 1..=65535"));
        }

        let url = self.database.url.trim().to_lowercase();
        if url.is_empty() {
            return Err(anyhow!("DATABASE_URL is required"));
        }
        if !(url.starts_with("postgresql://") || url.starts_with("postgres://")) {
            return Err(anyhow!("DATABASE_URL must start with postgresql:// or postgres://"));
        }
        if self.database.max_connections == 0 {
            return Err(anyhow!("DATABASE_MAX_CONNECTIONS must be >= 1"));
        }
        if self.database.acquire_timeout_secs == 0 {
            return Err(anyhow!("DATABASE_ACQUIRE_TIMEOUT_SECS must be positive"));
        }

        if self.jwt.secret.trim().is_empty() {
            self.jwt.secret = DEV_JWT_SECRET.to_string();
        }
        if self.jwt.expiration_hours <= 0 || self.jwt.expiration_hours > MAX_JWT_EXPIRATION_HOURS {
            return Err(anyhow!(
                "JWT_EXPIRATION_HOURS must be in 1..={}",
                MAX_JWT_EXPIRATION_HOURS
            ));
        }

        if self.otp.ttl_secs == 0 || self.otp.ttl_secs > MAX_OTP_TTL_SECS {
            return Err(anyhow!("OTP_TTL_SECS must be in 1..={}", MAX_OTP_TTL_SECS));
        }
        if self.otp.resend_cooldown_secs > MAX_OTP_RESEND_COOLDOWN_SECS {
            return Err(anyhow!(
                "OTP_RESEND_COOLDOWN_SECS must be at most {}",
                MAX_OTP_RESEND_COOLDOWN_SECS
            ));
        }
        if self.otp.max_attempts == 0 {
            return Err(anyhow!("OTP_MAX_ATTEMPTS must be >= 1"));
        }
        if self.otp.cleanup_interval_secs == 0 {
            return Err(anyhow!("OTP_CLEANUP_INTERVAL_SECS must be positive"));
        }

        if self.email.sender.trim().is_empty() {
            return Err(anyhow!("EMAIL_SENDER must not be empty"));
        }
        if let Some(api_url) = &self.email.api_url {
            if !(api_url.starts_with("http://") || api_url.starts_with("https://")) {
                return Err(anyhow!("EMAIL_API_URL must be an http(s) URL"));
            }
            if self.email.api_token.is_none() {
                return Err(anyhow!("EMAIL_API_TOKEN is required when EMAIL_API_URL is set"));
            }
        }

        Ok(())
    }

    /// JWT_SECRET 미설정 여부 (개발용 secret 사용 중)
    pub fn uses_dev_jwt_secret(&self) -> bool {
        self.jwt.secret == DEV_JWT_SECRET
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_or(key: &str, default: &str) -> String {
    env_opt(key).unwrap_or_else(|| default.to_string())
}

fn env_parse<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env_opt(key) {
        Some(raw) => raw
            .parse::<T>()
            .map_err(|e| anyhow!("{}", e))
            .with_context(|| format!("Invalid value for {}: '{}'", key, raw)),
        None => Ok(default),
    }
}
