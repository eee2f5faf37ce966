use std::time::Duration;
use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::shared::config::EmailConfig;

const SERVER_TOKEN_HEADER: &str = "X-Postmark-Server-Token";

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("failed to build email client: {0}")]
    Client(String),

    #[error("email request failed: {0}")]
    Request(String),

    #[error("email API returned {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// 이메일 발송 추상화
/// Outbound email seam; the OTP flow only talks to this trait
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send_email(
        &self,
        recipient: &str,
        subject: &str,
        html_body: &str,
        text_body: &str,
    ) -> Result<(), EmailError>;
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    html_body: &'a str,
    text_body: &'a str,
}

// 트랜잭션 이메일 HTTP API 클라이언트
// HTTP client for a Postmark-style transactional email API
pub struct HttpEmailClient {
    http_client: reqwest::Client,
    base_url: String,
    sender: String,
    api_token: String,
}

impl HttpEmailClient {
    pub fn new(
        base_url: impl Into<String>,
        sender: impl Into<String>,
        api_token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, EmailError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| EmailError::Client(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            sender: sender.into(),
            api_token: api_token.into(),
        })
    }
}

#[async_trait]
impl EmailSender for HttpEmailClient {
    async fn send_email(
        &self,
        recipient: &str,
        subject: &str,
        html_body: &str,
        text_body: &str,
    ) -> Result<(), EmailError> {
        let url = format!("{}/email", self.base_url);
        let body = SendEmailRequest {
            from: &self.sender,
            to: recipient,
            subject,
            html_body,
            text_body,
        };

        let response = self
            .http_client
            .post(&url)
            .header(SERVER_TOKEN_HEADER, &self.api_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| EmailError::Request(e.to_string()))?;

        // HTTP 상태 코드 확인
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(EmailError::Rejected { status, body });
        }

        tracing::debug!(%recipient, "email accepted by provider");
        Ok(())
    }
}

/// 개발용: 실제 발송 없이 로그로만 출력
/// Development fallback used when no email API is configured
#[derive(Debug, Default, Clone)]
pub struct LogEmailSender;

#[async_trait]
impl EmailSender for LogEmailSender {
    async fn send_email(
        &self,
        recipient: &str,
        subject: &str,
        _html_body: &str,
        text_body: &str,
    ) -> Result<(), EmailError> {
        // 본문에는 OTP가 포함되므로 debug 레벨에서만 출력
        tracing::info!(%recipient, %subject, "email not sent (no email API configured)");
        tracing::debug!(%recipient, body = %text_body, "unsent email body");
        Ok(())
    }
}

/// 설정에 따라 EmailSender 선택
/// Picks the HTTP client when `EMAIL_API_URL` is set, the log sender otherwise
pub fn build_email_sender(config: &EmailConfig) -> Result<std::sync::Arc<dyn EmailSender>, EmailError> {
    match (&config.api_url, &config.api_token) {
        (Some(url), Some(token)) => {
            let client = HttpEmailClient::new(
                url.as_str(),
                config.sender.as_str(),
                token.as_str(),
                Duration::from_millis(config.timeout_ms),
            )?;
            Ok(std::sync::Arc::new(client))
        }
        _ => {
            tracing::warn!("EMAIL_API_URL not configured; verification emails will only be logged");
            Ok(std::sync::Arc::new(LogEmailSender))
        }
    }
}

/// Recording sender for tests
pub mod mock {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct SentEmail {
        pub recipient: String,
        pub subject: String,
        pub html_body: String,
        pub text_body: String,
    }

    #[derive(Default)]
    pub struct RecordingEmailSender {
        sent: Mutex<Vec<SentEmail>>,
        fail: bool,
    }

    impl RecordingEmailSender {
        pub fn new() -> Self {
            Self::default()
        }

        /// 항상 실패하는 sender
        pub fn failing() -> Self {
            Self { sent: Mutex::new(Vec::new()), fail: true }
        }

        pub fn sent(&self) -> Vec<SentEmail> {
            self.sent.lock().clone()
        }

        pub fn last_to(&self, recipient: &str) -> Option<SentEmail> {
            self.sent.lock().iter().rev().find(|m| m.recipient == recipient).cloned()
        }
    }

    #[async_trait]
    impl EmailSender for RecordingEmailSender {
        async fn send_email(
            &self,
            recipient: &str,
            subject: &str,
            html_body: &str,
            text_body: &str,
        ) -> Result<(), EmailError> {
            if self.fail {
                return Err(EmailError::Rejected { status: 503, body: "unavailable".to_string() });
            }
            self.sent.lock().push(SentEmail {
                recipient: recipient.to_string(),
                subject: subject.to_string(),
                html_body: html_body.to_string(),
                text_body: text_body.to_string(),
            });
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn can_bind_localhost() -> bool {
        std::net::TcpListener::bind("127.0.0.1:0").is_ok()
    }

    #[tokio::test]
    async fn test_http_client_posts_expected_payload() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/email"))
            .and(header(SERVER_TOKEN_HEADER, "token-123"))
            .and(body_json(json!({
                "From": "no-reply@clinic.test",
                "To": "patient@example.com",
                "Subject": "Verify",
                "HtmlBody": "<p>123456</p>",
                "TextBody": "123456"
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpEmailClient::new(
            format!("{}/", server.uri()),
            "no-reply@clinic.test",
            "token-123",
            Duration::from_secs(5),
        )
        .unwrap();

        client
            .send_email("patient@example.com", "Verify", "<p>123456</p>", "123456")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_http_client_reports_provider_rejection() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/email"))
            .respond_with(ResponseTemplate::new(422).set_body_string("bad recipient"))
            .mount(&server)
            .await;

        let client =
            HttpEmailClient::new(server.uri(), "no-reply@clinic.test", "t", Duration::from_secs(5))
                .unwrap();

        let err = client.send_email("x@example.com", "s", "h", "t").await.unwrap_err();
        match err {
            EmailError::Rejected { status, body } => {
                assert_eq!(status, 422);
                assert_eq!(body, "bad recipient");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(std::sync::Arc<parking_lot::Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_log_sender_keeps_body_out_of_info_logs() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        LogEmailSender
            .send_email("patient@example.com", "Verify", "<p>482913</p>", "code 482913")
            .await
            .unwrap();

        let output = String::from_utf8(logs.0.lock().clone()).unwrap();
        assert!(output.contains("patient@example.com"));
        assert!(!output.contains("482913"));
    }

    #[tokio::test]
    async fn test_build_email_sender_without_url_uses_log_sender() {
        let config = EmailConfig {
            api_url: None,
            api_token: None,
            sender: "no-reply@localhost".to_string(),
            timeout_ms: 1000,
        };
        let sender = build_email_sender(&config).unwrap();
        assert!(sender.send_email("a@example.com", "s", "h", "t").await.is_ok());
    }
}
