// --- File: crates/medibook_common/src/http.rs ---

// Outbound HTTP client construction
pub mod client;
