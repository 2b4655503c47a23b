// --- File: crates/medibook_notify/src/doc.rs ---
#![cfg(feature = "openapi")]
use utoipa::OpenApi;

use crate::logic::{AppointmentRequest, EmailRequest};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::send_email_handler,
        crate::handlers::book_and_notify_handler
    ),
    components(schemas(EmailRequest, AppointmentRequest)),
    tags((name = "Notify", description = "Email notifications"))
)]
pub struct NotifyApiDoc;
