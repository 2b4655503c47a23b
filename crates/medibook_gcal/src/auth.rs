// File: crates/medibook_gcal/src/auth.rs
//! Bearer credentials for the calendar API.
//!
//! [`TokenProvider`] owns the only shared mutable state in the booking flow: the
//! cached access token. The check-and-refresh runs under an async mutex, so
//! concurrent callers trigger at most one refresh.

use std::{path::Path, sync::Arc, time::Duration as StdDuration};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use hyper_util::client::legacy::connect::Connect;
use medibook_common::services::CalendarError;
use tokio::sync::Mutex;
use tracing::{debug, info};
use yup_oauth2::{authenticator::Authenticator, read_service_account_key, ServiceAccountAuthenticator};

/// Scope requested for the service account.
pub const CALENDAR_SCOPE: &str = "https://www.googleapis.com/auth/calendar";

/// A cached token is refreshed this long before it actually expires.
const EXPIRY_MARGIN_SECS: i64 = 60;

/// A bearer credential together with its expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub bearer: String,
    /// `None` when the identity provider did not report an expiry.
    pub expires_at: Option<DateTime<Utc>>,
    pub valid: bool,
}

impl AccessToken {
    pub fn new(bearer: impl Into<String>, expires_at: Option<DateTime<Utc>>) -> Self {
        Self {
            bearer: bearer.into(),
            expires_at,
            valid: true,
        }
    }

    /// Whether the token can still be sent at `now`.
    pub fn is_usable_at(&self, now: DateTime<Utc>) -> bool {
        if !self.valid {
            return false;
        }
        match self.expires_at {
            Some(expires_at) => expires_at - Duration::seconds(EXPIRY_MARGIN_SECS) > now,
            None => true,
        }
    }
}

/// Source of fresh access tokens.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn fetch_token(&self) -> Result<AccessToken, CalendarError>;
}

/// Caches the calendar access token and refreshes it on demand.
pub struct TokenProvider {
    identity: Arc<dyn IdentityProvider>,
    cached: Mutex<Option<AccessToken>>,
}

impl TokenProvider {
    pub fn new(identity: Arc<dyn IdentityProvider>) -> Self {
        Self {
            identity,
            cached: Mutex::new(None),
        }
    }

    /// Returns a usable bearer string, refreshing it first when needed.
    pub async fn get_token(&self) -> Result<String, CalendarError> {
        let mut cached = self.cached.lock().await;

        if let Some(token) = cached.as_ref().filter(|t| t.is_usable_at(Utc::now())) {
            return Ok(token.bearer.clone());
        }

        debug!("Refreshing calendar access token");
        let fresh = self.identity.fetch_token().await?;
        let bearer = fresh.bearer.clone();
        *cached = Some(fresh);
        Ok(bearer)
    }

    /// Marks the cached token unusable; the next [`get_token`](Self::get_token)
    /// refreshes it.
    pub async fn invalidate(&self) {
        if let Some(token) = self.cached.lock().await.as_mut() {
            token.valid = false;
        }
    }
}

/// Google service-account flow backed by `yup-oauth2`.
pub struct ServiceAccountIdentity<C>
where
    C: Connect + Clone + Send + Sync + 'static,
{
    authenticator: Authenticator<C>,
    scopes: Vec<String>,
    timeout: StdDuration,
}

impl<C> ServiceAccountIdentity<C>
where
    C: Connect + Clone + Send + Sync + 'static,
{
    pub fn new(authenticator: Authenticator<C>, timeout: StdDuration) -> Self {
        Self {
            authenticator,
            scopes: vec![CALENDAR_SCOPE.to_string()],
            timeout,
        }
    }
}

#[async_trait]
impl<C> IdentityProvider for ServiceAccountIdentity<C>
where
    C: Connect + Clone + Send + Sync + 'static,
{
    async fn fetch_token(&self) -> Result<AccessToken, CalendarError> {
        let token = tokio::time::timeout(self.timeout, self.authenticator.token(&self.scopes))
            .await
            .map_err(|_| CalendarError::Credentials("token request timed out".to_string()))?
            .map_err(|e| CalendarError::Credentials(e.to_string()))?;

        let bearer = token.token().ok_or_else(|| {
            CalendarError::Credentials("token response carried no access token".to_string())
        })?;
        let expires_at = token
            .expiration_time()
            .and_then(|t| DateTime::<Utc>::from_timestamp(t.unix_timestamp(), 0));

        Ok(AccessToken::new(bearer, expires_at))
    }
}

/// Reads the service-account key at `key_path` and builds the identity provider.
pub async fn service_account_identity(
    key_path: &Path,
    timeout: StdDuration,
) -> Result<Arc<dyn IdentityProvider>, CalendarError> {
    let key = read_service_account_key(key_path).await.map_err(|e| {
        CalendarError::Credentials(format!(
            "cannot read service account key {}: {}",
            key_path.display(),
            e
        ))
    })?;

    let authenticator = ServiceAccountAuthenticator::builder(key)
        .build()
        .await
        .map_err(|e| CalendarError::Credentials(e.to_string()))?;

    info!("Service account authenticator ready");
    Ok(Arc::new(ServiceAccountIdentity::new(authenticator, timeout)))
}
