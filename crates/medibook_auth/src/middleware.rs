// --- File: crates/medibook_auth/src/middleware.rs ---
use std::sync::Arc;

use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::error::AuthError;
use crate::session::SessionManager;
use crate::store::CredentialRecord;

/// The user behind a verified `Authorization: Bearer` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser(pub CredentialRecord);

/// Extracts the token from `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

async fn authenticate(
    sessions: &SessionManager,
    headers: &HeaderMap,
) -> Result<AuthenticatedUser, AuthError> {
    let token = bearer_token(headers).ok_or_else(|| {
        debug!("Request without bearer token");
        AuthError::InvalidCredentials
    })?;
    sessions.verify(token).await.map(AuthenticatedUser)
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    Arc<SessionManager>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthenticatedUser>() {
            return Ok(user.clone());
        }
        let sessions = Arc::<SessionManager>::from_ref(state);
        authenticate(&sessions, &parts.headers).await
    }
}

/// Rejects requests without a valid bearer token with 401. The verified user is
/// stored in the request extensions for downstream handlers.
pub async fn require_bearer(
    State(sessions): State<Arc<SessionManager>>,
    mut req: Request,
    next: Next,
) -> Response {
    match authenticate(&sessions, req.headers()).await {
        Ok(user) => {
            req.extensions_mut().insert(user);
            next.run(req).await
        }
        Err(e) => e.into_response(),
    }
}
