// --- File: crates/medibook_auth/src/routes.rs ---
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{login_handler, me_handler};
use crate::session::SessionManager;

/// Creates a router with `/token` and `/me`.
pub fn routes(sessions: Arc<SessionManager>) -> Router {
    Router::new()
        .route("/token", post(login_handler))
        .route("/me", get(me_handler))
        .with_state(sessions)
}
