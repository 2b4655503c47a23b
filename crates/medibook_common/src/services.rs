// --- File: crates/medibook_common/src/services.rs ---
//! Service abstractions for external services.
//!
//! The calendar provider and the mail transport sit behind these traits so the
//! booking logic can be exercised without network access. With the `mock`
//! feature enabled, `mockall` generates `MockCalendarService` and
//! `MockNotificationService` for other crates' tests.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{CalendarEvent, NewCalendarEvent, NotificationResult, TimeRange};

/// Failure talking to the calendar provider.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CalendarError {
    /// The provider answered with a non-success status. `body` is the raw text.
    #[error("calendar provider returned {status}: {body}")]
    Provider { status: u16, body: String },
    #[error("calendar request failed: {0}")]
    Transport(String),
    #[error("calendar credentials unavailable: {0}")]
    Credentials(String),
    #[error("unreadable calendar response: {0}")]
    Decode(String),
}

impl CalendarError {
    /// Text handed back to API clients: the provider's own body when there is
    /// one, the error message otherwise.
    pub fn detail(&self) -> String {
        match self {
            CalendarError::Provider { body, .. } => body.clone(),
            other => other.to_string(),
        }
    }

    /// The provider status when it answered, `None` for local failures.
    pub fn provider_status(&self) -> Option<u16> {
        match self {
            CalendarError::Provider { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Failure sending a notification.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NotificationError {
    #[error("invalid email address: {0}")]
    InvalidAddress(String),
    #[error("could not build message: {0}")]
    Build(String),
    #[error("mail transport failed: {0}")]
    Transport(String),
}

/// Calendar provider operations used by the booking flow.
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait CalendarService: Send + Sync {
    /// Events overlapping `range`, expanded to single instances and ordered by
    /// start time.
    async fn list_events(&self, range: &TimeRange) -> Result<Vec<CalendarEvent>, CalendarError>;

    /// Creates an event and returns its provider id.
    async fn create_event(&self, event: &NewCalendarEvent) -> Result<String, CalendarError>;
}

/// Outbound notifications.
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait NotificationService: Send + Sync {
    /// Send a plain-text email.
    async fn send_email(
        &self,
        to: &str,
        subject: &str,
        body: &str,
    ) -> Result<NotificationResult, NotificationError>;
}

/// A factory for creating service instances.
///
/// The backend builds one factory at startup; each accessor returns `None`
/// when the matching integration is switched off or not configured.
pub trait ServiceFactory: Send + Sync {
    fn calendar_service(&self) -> Option<Arc<dyn CalendarService>>;

    fn notification_service(&self) -> Option<Arc<dyn NotificationService>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_prefers_raw_provider_body() {
        let err = CalendarError::Provider {
            status: 403,
            body: "{\"error\":\"forbidden\"}".into(),
        };
        assert_eq!(err.detail(), "{\"error\":\"forbidden\"}");
        assert_eq!(err.provider_status(), Some(403));

        let err = CalendarError::Transport("timed out".into());
        assert_eq!(err.detail(), "calendar request failed: timed out");
        assert_eq!(err.provider_status(), None);
    }
}
