// --- File: crates/medibook_notify/src/routes.rs ---
use std::sync::Arc;

use axum::{routing::post, Router};

use crate::handlers::{book_and_notify_handler, send_email_handler, NotifyState};

pub fn routes(state: Arc<NotifyState>) -> Router {
    Router::new()
        .route("/send_email", post(send_email_handler))
        .route("/book_and_notify", post(book_and_notify_handler))
        .with_state(state)
}
