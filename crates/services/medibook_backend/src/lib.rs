// --- File: crates/services/medibook_backend/src/lib.rs ---
pub mod app;
pub mod app_state;
pub mod service_factory;
