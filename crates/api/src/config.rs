use academy_db::repositories::tenant_settings_repo::SettingsDefaults;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Graceful shutdown timeout in seconds (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Seed values for a freshly provisioned tenant's settings row.
    pub settings_defaults: SettingsDefaults,
    /// How often the auto-completion sweep runs, in seconds (default: `300`).
    pub sweep_interval_secs: u64,
    /// How often the horizon generation loop runs, in seconds
    /// (default: `3600`).
    pub horizon_interval_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                       | Default                 |
    /// |-------------------------------|-------------------------|
    /// | `HOST`                        | `0.0.0.0`               |
    /// | `PORT`                        | `3000`                  |
    /// | `CORS_ORIGINS`                | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`        | `30`                    |
    /// | `SHUTDOWN_TIMEOUT_SECS`       | `30`                    |
    /// | `CHECKIN_EARLY_MINUTES`       | `15`                    |
    /// | `CHECKIN_LATE_MINUTES`        | `15`                    |
    /// | `AUTOCOMPLETE_GRACE_MINUTES`  | `120`                   |
    /// | `HORIZON_DAYS`                | `30`                    |
    /// | `REQUIRE_ACTIVE_SUBSCRIPTION` | `false`                 |
    /// | `SWEEP_INTERVAL_SECS`         | `300`                   |
    /// | `HORIZON_INTERVAL_SECS`       | `3600`                  |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let settings_defaults = SettingsDefaults {
            checkin_early_minutes: env_parse("CHECKIN_EARLY_MINUTES", 15),
            checkin_late_minutes: env_parse("CHECKIN_LATE_MINUTES", 15),
            autocomplete_grace_minutes: env_parse("AUTOCOMPLETE_GRACE_MINUTES", 120),
            horizon_days: env_parse("HORIZON_DAYS", 30),
            require_active_subscription: env_parse("REQUIRE_ACTIVE_SUBSCRIPTION", false),
        };

        Self {
            host,
            port: env_parse("PORT", 3000),
            cors_origins,
            request_timeout_secs: env_parse("REQUEST_TIMEOUT_SECS", 30),
            shutdown_timeout_secs: env_parse("SHUTDOWN_TIMEOUT_SECS", 30),
            settings_defaults,
            sweep_interval_secs: env_parse("SWEEP_INTERVAL_SECS", 300),
            horizon_interval_secs: env_parse("HORIZON_INTERVAL_SECS", 3600),
        }
    }
}

/// Parse an environment variable, falling back to `default` when unset.
///
/// Panics on a malformed value; misconfiguration should fail at startup,
/// not at first use.
fn env_parse<T>(name: &str, default: T) -> T
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .parse()
            .unwrap_or_else(|e| panic!("{name} has an invalid value '{raw}': {e}")),
        Err(_) => default,
    }
}
