// --- File: crates/medibook_gcal/src/lib.rs ---
// Declare modules within this crate
pub mod auth;
pub mod booking;
pub mod doc;
pub mod handlers;
#[cfg(test)]
mod handlers_test;
pub mod logic;
#[cfg(test)]
mod logic_proptest;
pub mod routes;
pub mod service;

pub use booking::{BookingError, BookingOrchestrator};
pub use logic::{AvailabilityDecision, BookingResult, BookingRules, Rejection, TimeRequest};
