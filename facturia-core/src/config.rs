use std::env;
use std::time::Duration;

/// Error raised when an environment variable holds an unusable value.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Runtime configuration for the dashboard server.
///
/// Values come from the process environment (after `.env` has been loaded
/// by the binary). Every setting has a default so a bare checkout runs
/// against a local backend.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Base URL of the remote invoice backend
    pub api_base_url: String,

    /// Per-request timeout for backend calls
    pub api_timeout: Duration,

    /// Bearer token sent to the backend, if any
    pub api_token: Option<String>,

    pub server_host: String,
    pub server_port: u16,

    /// HMAC secret for operator session tokens
    pub jwt_secret: String,

    /// Company used when a session token carries none
    pub default_company_phone: String,

    /// Unread notifications older than this are dropped
    pub notification_ttl: Duration,

    /// How often the notification sweeper runs
    pub notification_sweep_interval: Duration,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:3001/api".to_string(),
            api_timeout: Duration::from_secs(10),
            api_token: None,
            server_host: "0.0.0.0".to_string(),
            server_port: 3000,
            jwt_secret: "secret".to_string(),
            default_company_phone: String::new(),
            notification_ttl: Duration::from_secs(5),
            notification_sweep_interval: Duration::from_secs(1),
        }
    }
}

impl DashboardConfig {
    /// Reads the configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if a numeric variable does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Ok(Self {
            api_base_url: lookup("API_BASE_URL").unwrap_or(defaults.api_base_url),
            api_timeout: parse_secs(&lookup, "API_TIMEOUT_SECONDS")?.unwrap_or(defaults.api_timeout),
            api_token: lookup("API_TOKEN").filter(|t| !t.is_empty()),
            server_host: lookup("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port: match lookup("SERVER_PORT") {
                Some(raw) => raw.parse::<u16>().map_err(|_| ConfigError::Invalid {
                    name: "SERVER_PORT",
                    value: raw,
                })?,
                None => defaults.server_port,
            },
            jwt_secret: lookup("JWT_SECRET").unwrap_or(defaults.jwt_secret),
            default_company_phone: lookup("COMPANY_PHONE").unwrap_or(defaults.default_company_phone),
            notification_ttl: parse_secs(&lookup, "NOTIFICATION_TTL_SECONDS")?
                .unwrap_or(defaults.notification_ttl),
            notification_sweep_interval: parse_secs(&lookup, "NOTIFICATION_SWEEP_SECONDS")?
                .unwrap_or(defaults.notification_sweep_interval),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn parse_secs<F>(lookup: &F, name: &'static str) -> Result<Option<Duration>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(raw) => raw
            .parse::<u64>()
            .map(|secs| Some(Duration::from_secs(secs)))
            .map_err(|_| ConfigError::Invalid { name, value: raw }),
        None => Ok(None),
    }
}
