use config::{Config, Environment, File};
use once_cell::sync::OnceCell;
use serde_json::Value;
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

pub mod models;
pub use models::*;

/// Marker value that is replaced by an environment variable named after its config path.
pub const SECRET_MARKER: &str = "secret_from_env";

#[derive(Error, Debug)]
pub enum ConfigLoadError {
    #[error("failed to load configuration: {0}")]
    Source(#[from] config::ConfigError),
    #[error("failed to apply secret overrides: {0}")]
    Secrets(#[from] serde_json::Error),
}

/// Loads the configuration for the current process.
///
/// Layers, lowest priority first:
/// 1. `{CONFIG_DIR}/default.*`
/// 2. `{CONFIG_DIR}/{RUN_ENV}.*`
/// 3. environment variables with the `{PREFIX}__` prefix (`__` separates nesting levels)
///
/// `CONFIG_DIR` defaults to `config`, `RUN_ENV` to `debug` and `PREFIX` to `MEDIBOOK`.
/// Afterwards every `"secret_from_env"` value is replaced from the environment.
pub fn load_config() -> Result<AppConfig, ConfigLoadError> {
    ensure_dotenv_loaded();

    let run_env = env::var("RUN_ENV").unwrap_or_else(|_| "debug".to_string());
    let config_dir = env::var("CONFIG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config"));

    load_config_from(&config_dir, &run_env)
}

/// Loads the configuration from an explicit directory and environment name.
pub fn load_config_from(config_dir: &Path, run_env: &str) -> Result<AppConfig, ConfigLoadError> {
    let prefix = env::var("PREFIX").unwrap_or_else(|_| "MEDIBOOK".to_string());

    let default_path = config_dir.join("default");
    let env_path = config_dir.join(run_env);
    debug!(
        "Loading config from {} and {}",
        default_path.display(),
        env_path.display()
    );

    let builder = Config::builder()
        .add_source(File::with_name(&default_path.to_string_lossy()).required(false))
        .add_source(File::with_name(&env_path.to_string_lossy()).required(false))
        .add_source(Environment::with_prefix(&prefix).separator("__"));

    let raw_config: AppConfig = builder.build()?.try_deserialize()?;
    apply_env_overrides_from_marker(raw_config)
}

/// Recursively replaces all "secret_from_env" string values with environment variable values.
///
/// The variable name is the upper-cased config path joined by `_`; array elements
/// contribute their index, e.g. `auth.users[0].password_hash` -> `AUTH_USERS_0_PASSWORD_HASH`.
fn inject_env_secrets(value: &mut Value) {
    fn walk(path: Vec<String>, obj: &mut Value) {
        match obj {
            Value::Object(map) => {
                for (k, v) in map.iter_mut() {
                    let mut new_path = path.clone();
                    new_path.push(k.to_string());
                    walk(new_path, v);
                }
            }
            Value::Array(items) => {
                for (index, item) in items.iter_mut().enumerate() {
                    let mut new_path = path.clone();
                    new_path.push(index.to_string());
                    walk(new_path, item);
                }
            }
            Value::String(s) if s == SECRET_MARKER => {
                let env_key = path.join("_").to_uppercase();
                if let Ok(env_val) = env::var(&env_key) {
                    *obj = Value::String(env_val);
                } else {
                    warn!("env var {} not found for {}", env_key, SECRET_MARKER);
                }
            }
            _ => {}
        }
    }

    walk(vec![], value);
}

/// Applies environment overrides based on "secret_from_env" markers in the serialized config.
pub fn apply_env_overrides_from_marker(config: AppConfig) -> Result<AppConfig, ConfigLoadError> {
    let mut json = serde_json::to_value(&config)?;
    inject_env_secrets(&mut json);
    Ok(serde_json::from_value(json)?)
}

static INIT_DOTENV: OnceCell<()> = OnceCell::new();

/// Loads the dotenv file once per process and returns the path that was used.
///
/// `DOTENV_OVERRIDE` wins, then a first CLI argument starting with `.env`, then `.env`.
pub fn ensure_dotenv_loaded() -> String {
    let dotenv_path_override = env::var("DOTENV_OVERRIDE").ok();
    let dotenv_path_arg = env::args().nth(1).filter(|s| s.starts_with(".env"));

    let dotenv_path = dotenv_path_override
        .or(dotenv_path_arg)
        .unwrap_or_else(|| ".env".to_string());

    INIT_DOTENV.get_or_init(|| {
        dotenv::from_filename(&dotenv_path).ok();
    });

    dotenv_path
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixtures_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
    }

    #[test]
    fn test_load_config_from_fixture_layers_environment_file() {
        let config = load_config_from(&fixtures_dir(), "test").expect("fixture config loads");

        assert_eq!(config.server.host, "127.0.0.1");
        // test.toml overrides the port from default.toml
        assert_eq!(config.server.port, 5055);
        assert!(config.use_gcal);
        assert!(!config.use_email);

        let gcal = config.gcal.expect("gcal section");
        assert_eq!(gcal.calendar_id.as_deref(), Some("primary"));
        assert_eq!(gcal.time_zone.as_deref(), Some("Asia/Jerusalem"));
        assert_eq!(config.http.timeout_secs, 5);
    }

    #[test]
    fn test_missing_sections_fall_back_to_defaults() {
        let config = load_config_from(&fixtures_dir(), "missing").expect("fixture config loads");

        assert!(config.smtp.is_none());
        assert!(config.booking.rest_day.is_none());
        assert!(config.notify.booking_base_url.is_none());
    }

    #[test]
    fn test_secret_marker_is_replaced_from_environment() {
        env::set_var("SECRETTEST_AUTH_JWT_SECRET", "from-env");
        let mut json = serde_json::json!({
            "secrettest": { "auth": { "jwt_secret": SECRET_MARKER } }
        });

        inject_env_secrets(&mut json);

        assert_eq!(
            json["secrettest"]["auth"]["jwt_secret"],
            Value::String("from-env".to_string())
        );
    }

    #[test]
    fn test_secret_marker_in_array_uses_index() {
        env::set_var("ARRAYTEST_USERS_0_PASSWORD_HASH", "hash-0");
        let mut json = serde_json::json!({
            "arraytest": { "users": [ { "password_hash": SECRET_MARKER } ] }
        });

        inject_env_secrets(&mut json);

        assert_eq!(
            json["arraytest"]["users"][0]["password_hash"],
            Value::String("hash-0".to_string())
        );
    }

    #[test]
    fn test_unset_secret_keeps_marker() {
        let mut json = serde_json::json!({ "never_set_anywhere": { "value": SECRET_MARKER } });

        inject_env_secrets(&mut json);

        assert_eq!(json["never_set_anywhere"]["value"], Value::String(SECRET_MARKER.into()));
    }
}
