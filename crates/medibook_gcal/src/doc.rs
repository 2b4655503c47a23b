// File: crates/medibook_gcal/src/doc.rs

#![cfg(feature = "openapi")]
use utoipa::OpenApi;

use crate::logic::{AvailabilityDecision, BookingResult, TimeRequest};
use medibook_common::models::{CalendarEvent, EventDateTime};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::check_availability_handler,
        crate::handlers::book_appointment_handler,
        crate::handlers::doctor_appointments_handler
    ),
    components(
        schemas(
            TimeRequest,
            AvailabilityDecision,
            BookingResult,
            CalendarEvent,
            EventDateTime
        )
    ),
    tags(
        (name = "Booking", description = "Availability checks and bookings"),
        (name = "Doctor", description = "Doctor's appointment list")
    )
)]
pub struct GcalApiDoc;
