// --- File: crates/medibook_notify/src/logic.rs ---
//! Booking through the booking service, then confirming by email.

use medibook_common::{
    config_error, create_client,
    services::{NotificationError, NotificationService},
    MedibookError,
};
use medibook_config::{HttpConfig, NotifyConfig};
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use tracing::{info, warn};

pub const DEFAULT_BOOKING_BASE_URL: &str = "http://127.0.0.1:5000";
pub const CONFIRMATION_SUBJECT: &str = "Appointment Confirmation";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct EmailRequest {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AppointmentRequest {
    /// Recipient of the confirmation.
    pub to: String,
    pub summary: String,
    pub start: String,
    pub end: String,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NotifyError {
    /// The booking service refused; `detail` is its raw response body.
    #[error("Appointment booking failed")]
    Booking { detail: String },
    #[error("booking service unreachable: {0}")]
    Transport(String),
    #[error(transparent)]
    Email(#[from] NotificationError),
}

/// Calls `/book_appointment` on the booking service.
pub struct RemoteBookingClient {
    client: Client,
    book_url: Url,
}

impl RemoteBookingClient {
    pub fn new(client: Client, base_url: &str) -> Result<Self, MedibookError> {
        let mut book_url = Url::parse(base_url)
            .map_err(|e| config_error(format!("invalid booking base url '{base_url}': {e}")))?;
        book_url
            .path_segments_mut()
            .map_err(|_| config_error(format!("booking base url cannot carry a path: '{base_url}'")))?
            .pop_if_empty()
            .push("book_appointment");

        Ok(Self { client, book_url })
    }

    pub fn from_config(notify: &NotifyConfig, http: &HttpConfig) -> Result<Self, MedibookError> {
        let client = create_client(http.timeout_secs, false)?;
        Self::new(
            client,
            notify
                .booking_base_url
                .as_deref()
                .unwrap_or(DEFAULT_BOOKING_BASE_URL),
        )
    }

    pub fn book_url(&self) -> &Url {
        &self.book_url
    }

    pub async fn book(&self, request: &AppointmentRequest) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(self.book_url.clone())
            .json(&json!({
                "start": request.start,
                "end": request.end,
                "summary": request.summary,
            }))
            .send()
            .await
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let detail = response.text().await.map_err(|e| {
            warn!("Booking service answered {} with an unreadable body: {}", status, e);
            NotifyError::Transport(e.to_string())
        })?;
        warn!("Booking service answered {}: {}", status, detail);
        Err(NotifyError::Booking { detail })
    }
}

pub fn confirmation_body(request: &AppointmentRequest) -> String {
    format!(
        "Your appointment '{}' was scheduled from {} to {}.",
        request.summary, request.start, request.end
    )
}

/// Books the slot and mails a confirmation. Nothing is sent when booking fails.
pub async fn book_and_notify(
    booking: &RemoteBookingClient,
    notifier: &dyn NotificationService,
    request: &AppointmentRequest,
) -> Result<(), NotifyError> {
    booking.book(request).await?;

    notifier
        .send_email(&request.to, CONFIRMATION_SUBJECT, &confirmation_body(request))
        .await?;

    info!("Booked '{}' and notified {}", request.summary, request.to);
    Ok(())
}
