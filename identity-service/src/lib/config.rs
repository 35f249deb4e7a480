use std::env;

use auth::ConfigurationError;
use auth::TokenService;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Deserialize, Clone)]
pub struct AuthConfig {
    /// Base64-encoded HMAC secret.
    pub signing_key: String,
    pub token_lifetime_ms: i64,
    #[serde(default)]
    pub clock_skew_leeway_ms: u64,
}

impl AuthConfig {
    /// Builds the process-wide token service, rejecting unusable settings.
    pub fn token_service(&self) -> Result<TokenService, ConfigurationError> {
        Ok(
            TokenService::from_config(&self.signing_key, self.token_lifetime_ms)?
                .with_leeway(self.clock_skew_leeway_ms),
        )
    }
}

// Keeps the signing key out of startup logs and panic messages
impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("signing_key", &"<redacted>")
            .field("token_lifetime_ms", &self.token_lifetime_ms)
            .field("clock_skew_leeway_ms", &self.clock_skew_leeway_ms)
            .finish()
    }
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (AUTH__SIGNING_KEY, DATABASE__URL, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // AUTH__TOKEN_LIFETIME_MS=60000 overrides auth.token_lifetime_ms
            .add_source(
                Environment::with_prefix("")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Config = configuration.try_deserialize()?;

        Ok(config)
    }
}
