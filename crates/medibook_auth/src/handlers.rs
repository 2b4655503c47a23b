// --- File: crates/medibook_auth/src/handlers.rs ---
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Form, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use crate::error::AuthError;
use crate::middleware::AuthenticatedUser;
use crate::session::SessionManager;

/// OAuth2 password-grant style form.
#[derive(Debug, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UserProfile {
    pub email: String,
    pub role: String,
}

#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/token",
    request_body(content = LoginForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Session token issued", body = TokenResponse),
        (status = 400, description = "Incorrect username or password")
    ),
    tag = "Auth"
))]
pub async fn login_handler(
    State(sessions): State<Arc<SessionManager>>,
    Form(form): Form<LoginForm>,
) -> Response {
    match sessions.login(&form.username, &form.password).await {
        Ok(access_token) => Json(TokenResponse {
            access_token,
            token_type: "bearer".to_string(),
        })
        .into_response(),
        Err(AuthError::InvalidCredentials) => {
            info!("Failed login for {}", form.username);
            (
                StatusCode::BAD_REQUEST,
                Json(json!({ "detail": "Incorrect username or password" })),
            )
                .into_response()
        }
        Err(e) => {
            warn!("Login for {} failed: {}", form.username, e);
            e.into_response()
        }
    }
}

#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/me",
    responses(
        (status = 200, description = "The authenticated user", body = UserProfile),
        (status = 401, description = "Invalid credentials")
    ),
    security(("bearer" = [])),
    tag = "Auth"
))]
pub async fn me_handler(AuthenticatedUser(user): AuthenticatedUser) -> Json<UserProfile> {
    Json(UserProfile {
        email: user.email,
        role: user.role,
    })
}
