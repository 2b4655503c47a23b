// --- File: crates/medibook_config/src/models.rs ---

use serde::{Deserialize, Serialize};

// --- General Server Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

// --- Outbound HTTP Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HttpConfig {
    /// Timeout applied to every outbound request (calendar, remote booking).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

// --- Google Calendar Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GcalConfig {
    pub key_path: Option<String>,    // Path to the service account JSON key
    pub calendar_id: Option<String>, // Mandatory
    pub time_zone: Option<String>,   // IANA name written into created events
    pub api_base_url: Option<String>,
    pub upcoming_days: Option<i64>, // Window for /doctor/appointments
}

// --- Booking Rules Config ---
// Every field is optional; missing values fall back to the built-in rules.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct BookingRulesConfig {
    pub work_start_time: Option<String>, // "HH:MM"
    pub work_end_time: Option<String>,
    pub short_day_end_time: Option<String>,
    pub rest_day: Option<String>, // "Mon" .. "Sun"
    pub short_day: Option<String>,
    pub min_duration_minutes: Option<i64>,
    pub max_duration_minutes: Option<i64>,
}

// --- Auth Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct UserSeed {
    pub email: String,
    pub password_hash: String, // Argon2 PHC string, usually "secret_from_env"
    pub role: String,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String, // Secret loaded from env var: AUTH_JWT_SECRET
    pub token_expiry_minutes: Option<i64>,
    #[serde(default)]
    pub protect_doctor_routes: bool,
    #[serde(default)]
    pub users: Vec<UserSeed>,
}

// --- SMTP Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String, // Secret loaded from env var: SMTP_PASSWORD
    pub from_address: String,
    pub timeout_secs: Option<u64>,
}

// --- Notify Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct NotifyConfig {
    /// Base URL of the service exposing `/book_appointment`.
    pub booking_base_url: Option<String>,
}

// --- Unified App Configuration ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    // Server config is mandatory
    pub server: ServerConfig,

    // --- Runtime Flags (optional in config file, default to false) ---
    #[serde(default)]
    pub use_gcal: bool,
    #[serde(default)]
    pub use_auth: bool,
    #[serde(default)]
    pub use_email: bool,

    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub booking: BookingRulesConfig,
    #[serde(default)]
    pub notify: NotifyConfig,

    // --- Optional Feature Configurations ---
    #[serde(default)]
    pub gcal: Option<GcalConfig>,
    #[serde(default)]
    pub auth: Option<AuthConfig>,
    #[serde(default)]
    pub smtp: Option<SmtpConfig>,
}
