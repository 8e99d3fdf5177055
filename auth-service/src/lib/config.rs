use std::env;

use auth::TokenSettings;
use chrono::Duration;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

/// Application configuration for auth-service.
///
/// Built once at startup and handed to the components that need it.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub jwt: JwtConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_http_port")]
    pub http_port: u16,
    /// Upper bound for a whole request, database round-trips included.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    /// Access token signing secret. Startup fails without it.
    #[serde(default)]
    pub secret: Option<String>,
    /// Refresh token signing secret; the access secret is used when unset.
    #[serde(default)]
    pub refresh_secret: Option<String>,
    #[serde(default = "default_access_expiration_hours")]
    pub access_expiration_hours: i64,
    #[serde(default = "default_refresh_expiration_days")]
    pub refresh_expiration_days: i64,
    #[serde(default = "default_issuer")]
    pub issuer: String,
}

fn default_max_connections() -> u32 {
    5
}

fn default_acquire_timeout_secs() -> u64 {
    5
}

fn default_http_port() -> u16 {
    9000
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_access_expiration_hours() -> i64 {
    24
}

fn default_refresh_expiration_days() -> i64 {
    7
}

fn default_issuer() -> String {
    auth::issuer::DEFAULT_ISSUER.to_string()
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, JWT__SECRET, JWT__REFRESH_SECRET, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: JWT__REFRESH_SECRET=... overrides jwt.refresh_secret
            .add_source(Environment::default().separator("__"))
            .build()?;

        configuration.try_deserialize()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: default_http_port(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: None,
            refresh_secret: None,
            access_expiration_hours: default_access_expiration_hours(),
            refresh_expiration_days: default_refresh_expiration_days(),
            issuer: default_issuer(),
        }
    }
}

impl JwtConfig {
    /// Token issuer settings derived from this section.
    pub fn token_settings(&self) -> TokenSettings {
        TokenSettings {
            access_secret: self.secret.clone(),
            refresh_secret: self.refresh_secret.clone(),
            access_ttl: Duration::hours(self.access_expiration_hours),
            refresh_ttl: Duration::days(self.refresh_expiration_days),
            issuer: self.issuer.clone(),
        }
    }
}
