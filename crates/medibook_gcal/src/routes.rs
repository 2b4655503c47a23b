// --- File: crates/medibook_gcal/src/routes.rs ---

use crate::handlers::{
    book_appointment_handler, check_availability_handler, doctor_appointments_handler, GcalState,
};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Public booking endpoints.
pub fn booking_routes(state: Arc<GcalState>) -> Router {
    Router::new()
        .route("/check_availability", post(check_availability_handler))
        .route("/book_appointment", post(book_appointment_handler))
        .with_state(state)
}

/// Doctor-facing endpoints. The caller decides whether to put them behind
/// bearer authentication.
pub fn doctor_routes(state: Arc<GcalState>) -> Router {
    Router::new()
        .route("/doctor/appointments", get(doctor_appointments_handler))
        .with_state(state)
}
