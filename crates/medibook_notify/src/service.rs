// --- File: crates/medibook_notify/src/service.rs ---
//! SMTP delivery using `lettre`.

use std::time::Duration;

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::{authentication::Credentials, response::Response},
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use medibook_common::{
    config_error,
    models::NotificationResult,
    services::{NotificationError, NotificationService},
    MedibookError,
};
use medibook_config::{SmtpConfig, SECRET_MARKER};
use tracing::{info, warn};

pub const DEFAULT_SMTP_TIMEOUT_SECS: u64 = 20;

/// Sends plain-text mail through a STARTTLS relay.
#[derive(Clone)]
pub struct SmtpNotificationService {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpNotificationService {
    pub fn new(mailer: AsyncSmtpTransport<Tokio1Executor>, from: Mailbox) -> Self {
        Self { mailer, from }
    }

    /// Builds the transport from `[smtp]`. Credentials must have been supplied
    /// through the environment.
    pub fn from_config(config: &SmtpConfig) -> Result<Self, MedibookError> {
        if config.password == SECRET_MARKER || config.username == SECRET_MARKER {
            return Err(config_error(
                "SMTP credentials are not set (expected SMTP_USERNAME and SMTP_PASSWORD)",
            ));
        }

        let from: Mailbox = config.from_address.parse().map_err(|e| {
            config_error(format!("invalid smtp.from_address '{}': {}", config.from_address, e))
        })?;

        let timeout = config.timeout_secs.unwrap_or(DEFAULT_SMTP_TIMEOUT_SECS);
        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| config_error(format!("failed to create SMTP transport: {e}")))?
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .timeout(Some(Duration::from_secs(timeout)))
            .build();

        info!("SMTP relay {}:{} configured", config.host, config.port);
        Ok(Self::new(mailer, from))
    }
}

/// Builds the plain-text message; split out so it can be checked without a relay.
pub fn build_message(
    from: &Mailbox,
    to: &str,
    subject: &str,
    body: &str,
) -> Result<Message, NotificationError> {
    let to: Mailbox = to
        .parse()
        .map_err(|e| NotificationError::InvalidAddress(format!("{to}: {e}")))?;

    Message::builder()
        .from(from.clone())
        .to(to)
        .subject(subject)
        .header(ContentType::TEXT_PLAIN)
        .body(body.to_owned())
        .map_err(|e| NotificationError::Build(e.to_string()))
}

#[async_trait]
impl NotificationService for SmtpNotificationService {
    async fn send_email(
        &self,
        to: &str,
        subject: &str,
        body: &str,
    ) -> Result<NotificationResult, NotificationError> {
        let message = build_message(&self.from, to, subject, body)?;

        let response = self.mailer.send(message).await.map_err(|e| {
            warn!("Sending email to {} failed: {}", to, e);
            NotificationError::Transport(e.to_string())
        })?;

        info!("Email '{}' sent to {}", subject, to);
        Ok(notification_result(&response))
    }
}

/// The relay's first reply line doubles as the message id.
pub fn notification_result(response: &Response) -> NotificationResult {
    let id = response.message().next().map(str::to_string);
    NotificationResult {
        id,
        status: response.code().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn smtp_config() -> SmtpConfig {
        SmtpConfig {
            host: "smtp.example.com".into(),
            port: 587,
            username: "clinic".into(),
            password: "app-password".into(),
            from_address: "clinic@example.com".into(),
            timeout_secs: Some(5),
        }
    }

    #[test]
    fn test_build_message_rejects_bad_recipient() {
        let from: Mailbox = "clinic@example.com".parse().unwrap();
        assert!(matches!(
            build_message(&from, "not an address", "Hi", "Body"),
            Err(NotificationError::InvalidAddress(_))
        ));
        assert!(build_message(&from, "patient@example.com", "Hi", "Body").is_ok());
    }

    #[test]
    fn test_build_message_is_plain_text() {
        let from: Mailbox = "clinic@example.com".parse().unwrap();
        let message = build_message(&from, "patient@example.com", "Appointment Confirmation", "See you")
            .unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("Subject: Appointment Confirmation"));
        assert!(raw.contains("Content-Type: text/plain"));
        assert!(raw.contains("See you"));
    }

    #[test]
    fn test_notification_result_from_relay_reply() {
        use lettre::transport::smtp::response::{Category, Code, Detail, Severity};

        let code = Code::new(Severity::PositiveCompletion, Category::MailSystem, Detail::Zero);
        let reply = Response::new(code, vec!["2.0.0 OK queued as 4f2a".into()]);
        let result = notification_result(&reply);
        assert_eq!(result.status, "250");
        assert_eq!(result.id.as_deref(), Some("2.0.0 OK queued as 4f2a"));

        let silent = Response::new(code, vec![]);
        assert_eq!(notification_result(&silent).id, None);
    }

    #[test]
    fn test_from_config_requires_credentials() {
        let mut config = smtp_config();
        config.password = SECRET_MARKER.into();
        assert!(SmtpNotificationService::from_config(&config).is_err());

        let mut config = smtp_config();
        config.from_address = "nobody".into();
        assert!(SmtpNotificationService::from_config(&config).is_err());
    }
}
