use std::env;

use chrono::Duration;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

/// Application configuration for metrics-service.
///
/// Loaded once at startup and handed to the components that need it.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

/// Access token signing configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration_minutes: i64,
}

impl JwtConfig {
    /// Longest accepted token lifetime: one year.
    pub const MAX_EXPIRATION_MINUTES: i64 = 365 * 24 * 60;

    /// Lifetime of issued access tokens.
    ///
    /// # Errors
    /// Fails unless `expiration_minutes` is between 1 and
    /// `MAX_EXPIRATION_MINUTES`.
    pub fn token_ttl(&self) -> Result<Duration, ConfigError> {
        if !(1..=Self::MAX_EXPIRATION_MINUTES).contains(&self.expiration_minutes) {
            return Err(ConfigError::Message(format!(
                "jwt.expiration_minutes must be between 1 and {}, got {}",
                Self::MAX_EXPIRATION_MINUTES,
                self.expiration_minutes
            )));
        }

        Duration::try_minutes(self.expiration_minutes).ok_or_else(|| {
            ConfigError::Message(format!(
                "jwt.expiration_minutes is out of range: {}",
                self.expiration_minutes
            ))
        })
    }
}

/// Allowed browser origins. Empty means any origin.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct CorsConfig {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, JWT__SECRET, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    ///
    /// # Errors
    /// Fails when a source cannot be read, a required key is missing, or
    /// the token settings are unusable.
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: JWT__SECRET=... overrides jwt.secret
            .add_source(
                Environment::default()
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("cors.allowed_origins"),
            )
            .build()?;

        let config: Config = configuration.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    /// Check settings that deserialize fine but cannot be served with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.trim().is_empty() {
            return Err(ConfigError::Message(
                "jwt.secret must be set to a non-empty value".to_string(),
            ));
        }

        self.jwt.token_ttl()?;

        Ok(())
    }
}
