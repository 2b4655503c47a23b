// --- File: crates/medibook_auth/src/doc.rs ---
#![cfg(feature = "openapi")]
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

use crate::handlers::{LoginForm, TokenResponse, UserProfile};

struct BearerScheme;

impl Modify for BearerScheme {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(crate::handlers::login_handler, crate::handlers::me_handler),
    components(schemas(LoginForm, TokenResponse, UserProfile)),
    modifiers(&BearerScheme),
    tags((name = "Auth", description = "Login and session tokens"))
)]
pub struct AuthApiDoc;
