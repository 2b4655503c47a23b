//! Runtime feature flag handling.
//!
//! Each integration (calendar, auth, email) is switched on by a `use_*` flag in
//! [`medibook_config::AppConfig`] and needs its configuration section to be
//! present. Both conditions are checked here so the rule lives in one place.

use medibook_config::AppConfig;

/// Returns `true` when the flag is set and the feature's config section exists.
pub fn is_feature_enabled<T>(use_feature: bool, feature_config: Option<&T>) -> bool {
    use_feature && feature_config.is_some()
}

/// Check if the Google Calendar integration is enabled.
pub fn is_gcal_enabled(config: &AppConfig) -> bool {
    is_feature_enabled(config.use_gcal, config.gcal.as_ref())
}

/// Check if login and session tokens are enabled.
pub fn is_auth_enabled(config: &AppConfig) -> bool {
    is_feature_enabled(config.use_auth, config.auth.as_ref())
}

/// Check if outbound email is enabled.
pub fn is_email_enabled(config: &AppConfig) -> bool {
    is_feature_enabled(config.use_email, config.smtp.as_ref())
}
