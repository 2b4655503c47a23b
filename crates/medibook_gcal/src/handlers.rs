// File: crates/medibook_gcal/src/handlers.rs
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;
use medibook_common::services::CalendarError;
use serde_json::json;
use std::sync::Arc;
use tracing::error;

use crate::booking::{BookingError, BookingOrchestrator};
use crate::logic::TimeRequest;

// Define shared state needed by GCal handlers
#[derive(Clone)]
pub struct GcalState {
    pub orchestrator: Arc<BookingOrchestrator>,
}

impl GcalState {
    pub fn new(orchestrator: BookingOrchestrator) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
        }
    }
}

/// `{error: <raw provider text>}` with a 502.
fn provider_failure(err: &CalendarError) -> Response {
    (
        StatusCode::BAD_GATEWAY,
        Json(json!({ "error": err.detail() })),
    )
        .into_response()
}

/// Handler to check a proposed slot against the rules and the calendar.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/check_availability",
    request_body = TimeRequest,
    responses(
        (status = 200, description = "Availability decision", body = crate::logic::AvailabilityDecision),
        (status = 502, description = "Calendar provider failure")
    ),
    tag = "Booking"
))]
pub async fn check_availability_handler(
    State(state): State<Arc<GcalState>>,
    Json(request): Json<TimeRequest>,
) -> Response {
    match state.orchestrator.check_availability(&request).await {
        Ok(decision) => Json(decision).into_response(),
        Err(e) => {
            error!("Availability check failed: {}", e);
            provider_failure(&e)
        }
    }
}

/// Handler to create the calendar event for a slot.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/book_appointment",
    request_body = TimeRequest,
    responses(
        (status = 200, description = "Event created", body = crate::logic::BookingResult),
        (status = 400, description = "Malformed time range"),
        (status = 502, description = "Calendar provider failure")
    ),
    tag = "Booking"
))]
pub async fn book_appointment_handler(
    State(state): State<Arc<GcalState>>,
    Json(request): Json<TimeRequest>,
) -> Response {
    match state.orchestrator.book(&request).await {
        Ok(result) => Json(result).into_response(),
        Err(BookingError::Malformed(message)) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": message })),
        )
            .into_response(),
        Err(BookingError::Calendar(e)) => {
            error!("Booking failed: {}", e);
            provider_failure(&e)
        }
    }
}

/// Handler listing the doctor's appointments for the look-ahead window.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/doctor/appointments",
    responses(
        (status = 200, description = "Upcoming provider events", body = Vec<medibook_common::models::CalendarEvent>),
        (status = 502, description = "Calendar provider failure")
    ),
    tag = "Doctor"
))]
pub async fn doctor_appointments_handler(State(state): State<Arc<GcalState>>) -> Response {
    match state.orchestrator.upcoming_appointments(Utc::now()).await {
        Ok(events) => Json(events).into_response(),
        Err(e) => {
            error!("Listing appointments failed: {}", e);
            // Mirror the provider's status when it answered.
            let status = e
                .provider_status()
                .and_then(|code| StatusCode::from_u16(code).ok())
                .unwrap_or(StatusCode::BAD_GATEWAY);
            (status, Json(json!({ "error": e.detail() }))).into_response()
        }
    }
}
