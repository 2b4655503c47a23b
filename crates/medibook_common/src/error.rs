// --- File: crates/medibook_common/src/error.rs ---
use std::fmt;
use thiserror::Error;

/// Startup and configuration failures.
///
/// Request-time failures use the typed errors of each feature crate; this one
/// covers building services and starting the server.
#[derive(Error, Debug)]
pub enum MedibookError {
    /// The shared HTTP client could not be built
    #[error("HTTP client error: {0}")]
    HttpError(String),

    /// Missing or invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Binding or serving failed
    #[error("I/O error: {0}")]
    IoError(String),
}

impl From<reqwest::Error> for MedibookError {
    fn from(err: reqwest::Error) -> Self {
        MedibookError::HttpError(err.to_string())
    }
}

impl From<std::io::Error> for MedibookError {
    fn from(err: std::io::Error) -> Self {
        MedibookError::IoError(err.to_string())
    }
}

impl From<medibook_config::ConfigLoadError> for MedibookError {
    fn from(err: medibook_config::ConfigLoadError) -> Self {
        MedibookError::ConfigError(err.to_string())
    }
}

pub fn config_error<T: fmt::Display>(message: T) -> MedibookError {
    MedibookError::ConfigError(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_message() {
        assert_eq!(
            config_error("auth.jwt_secret is not set").to_string(),
            "Configuration error: auth.jwt_secret is not set"
        );
    }

    #[test]
    fn test_io_error_converts() {
        let err: MedibookError =
            std::io::Error::new(std::io::ErrorKind::AddrInUse, "address in use").into();
        assert!(matches!(err, MedibookError::IoError(ref m) if m == "address in use"));
    }
}
