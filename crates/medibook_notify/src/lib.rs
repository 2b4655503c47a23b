// --- File: crates/medibook_notify/src/lib.rs ---
pub mod doc;
pub mod handlers;
pub mod logic;
pub mod routes;
pub mod service;

pub use logic::{book_and_notify, AppointmentRequest, EmailRequest, NotifyError, RemoteBookingClient};
pub use service::SmtpNotificationService;
