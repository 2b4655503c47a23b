// --- File: crates/medibook_auth/src/session.rs ---
//! Login and session tokens.
//!
//! Tokens are HS256 JWTs carrying `{sub, role, iat, exp}`. They are not stored
//! anywhere; expiry is the only way a token stops working.

use std::sync::Arc;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use medibook_common::{config_error, MedibookError};
use medibook_config::{AuthConfig, SECRET_MARKER};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::AuthError;
use crate::password::verify_password;
use crate::store::{CredentialRecord, CredentialStore, InMemoryCredentialStore};

pub const DEFAULT_TOKEN_EXPIRY_MINUTES: i64 = 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// The user's email.
    pub sub: String,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

/// Authenticates users and issues/verifies their session tokens.
pub struct SessionManager {
    store: Arc<dyn CredentialStore>,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    default_ttl: Duration,
}

impl SessionManager {
    pub fn new(store: Arc<dyn CredentialStore>, secret: &[u8], default_ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            store,
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            default_ttl,
        }
    }

    /// Builds the manager from `[auth]`, seeding an in-memory credential store.
    pub fn from_config(config: &AuthConfig) -> Result<Self, MedibookError> {
        if config.jwt_secret.is_empty() || config.jwt_secret == SECRET_MARKER {
            return Err(config_error(
                "auth.jwt_secret is not set (expected AUTH_JWT_SECRET)",
            ));
        }

        let minutes = config
            .token_expiry_minutes
            .unwrap_or(DEFAULT_TOKEN_EXPIRY_MINUTES);
        if minutes <= 0 {
            return Err(config_error("auth.token_expiry_minutes must be positive"));
        }

        let store = InMemoryCredentialStore::from_seeds(&config.users);
        info!("Session tokens expire after {} minutes", minutes);
        Ok(Self::new(
            Arc::new(store),
            config.jwt_secret.as_bytes(),
            Duration::minutes(minutes),
        ))
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Issues a token valid for the default window.
    pub async fn login(&self, identity: &str, password: &str) -> Result<String, AuthError> {
        self.login_with_expiry(identity, password, self.default_ttl)
            .await
    }

    pub async fn login_with_expiry(
        &self,
        identity: &str,
        password: &str,
        ttl: Duration,
    ) -> Result<String, AuthError> {
        let record = self
            .store
            .find(identity)
            .await
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(password, &record.password_hash) {
            debug!("Password mismatch for {}", identity);
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.issue(&record, ttl)?;
        info!("Issued session token for {}", record.email);
        Ok(token)
    }

    fn issue(&self, record: &CredentialRecord, ttl: Duration) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: record.email.clone(),
            role: record.role.clone(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Signing(e.to_string()))
    }

    /// Checks signature and expiry and returns the claims.
    pub fn decode_claims(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!("Session token rejected: {}", e);
                AuthError::InvalidCredentials
            })
    }

    /// Resolves a token to the user it was issued for. The user must still
    /// exist in the store.
    pub async fn verify(&self, token: &str) -> Result<CredentialRecord, AuthError> {
        let claims = self.decode_claims(token)?;
        self.store
            .find(&claims.sub)
            .await
            .ok_or(AuthError::InvalidCredentials)
    }
}
