// --- File: crates/medibook_auth/src/lib.rs ---
pub mod doc;
pub mod error;
pub mod handlers;
#[cfg(test)]
mod handlers_test;
pub mod middleware;
pub mod password;
pub mod routes;
pub mod session;
pub mod store;

pub use error::AuthError;
pub use middleware::{require_bearer, AuthenticatedUser};
pub use session::{Claims, SessionManager};
pub use store::{CredentialRecord, CredentialStore, InMemoryCredentialStore};
