// --- File: crates/medibook_notify/src/handlers.rs ---
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use medibook_common::services::NotificationService;
use serde_json::json;
use tracing::error;

use crate::logic::{book_and_notify, AppointmentRequest, EmailRequest, NotifyError, RemoteBookingClient};

#[derive(Clone)]
pub struct NotifyState {
    pub notifier: Arc<dyn NotificationService>,
    pub booking: Arc<RemoteBookingClient>,
}

fn failure(status: StatusCode, detail: String) -> Response {
    (status, Json(json!({ "detail": detail }))).into_response()
}

#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/send_email",
    request_body = EmailRequest,
    responses(
        (status = 200, description = "Email handed to the relay"),
        (status = 500, description = "Email could not be sent")
    ),
    tag = "Notify"
))]
pub async fn send_email_handler(
    State(state): State<Arc<NotifyState>>,
    Json(request): Json<EmailRequest>,
) -> Response {
    match state
        .notifier
        .send_email(&request.to, &request.subject, &request.body)
        .await
    {
        Ok(_) => Json(json!({ "status": "Email sent successfully" })).into_response(),
        Err(e) => {
            error!("Email to {} failed: {}", request.to, e);
            failure(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/book_and_notify",
    request_body = AppointmentRequest,
    responses(
        (status = 200, description = "Booked and confirmation sent"),
        (status = 502, description = "Booking service refused the slot; no email sent"),
        (status = 500, description = "Booked but the email failed, or the booking service was unreachable")
    ),
    tag = "Notify"
))]
pub async fn book_and_notify_handler(
    State(state): State<Arc<NotifyState>>,
    Json(request): Json<AppointmentRequest>,
) -> Response {
    match book_and_notify(&state.booking, state.notifier.as_ref(), &request).await {
        Ok(()) => Json(json!({ "status": "Appointment booked and email sent." })).into_response(),
        Err(NotifyError::Booking { detail }) => (
            StatusCode::BAD_GATEWAY,
            Json(json!({ "error": "Appointment booking failed", "detail": detail })),
        )
            .into_response(),
        Err(e) => {
            error!("book_and_notify for {} failed: {}", request.to, e);
            failure(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}
