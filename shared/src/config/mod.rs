//! Configuration module with one sub-module per concern
//!
//! - `environment` - Environment detection and logging configuration
//! - `server` - HTTP server and CORS configuration
//! - `verification` - One-time code lifetime and message templates
//! - `email` - Outbound e-mail provider settings
//!
//! Values are layered with the `config` crate: built-in defaults for the
//! detected environment, then an optional `config.<environment>.toml`, then
//! `RELAY__`-prefixed environment variables (`RELAY__SERVER__PORT=5051`).

pub mod email;
pub mod environment;
pub mod server;
pub mod verification;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use email::EmailConfig;
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use server::{CorsConfig, ServerConfig};
pub use verification::VerificationConfig;

/// Prefix for environment variable overrides
pub const ENV_PREFIX: &str = "RELAY";

/// Separator between nested keys in environment variable overrides
pub const ENV_SEPARATOR: &str = "__";

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Server configuration
    pub server: ServerConfig,

    /// Verification code configuration
    pub verification: VerificationConfig,

    /// Outbound e-mail configuration
    pub email: EmailConfig,

    /// CORS configuration
    #[serde(default)]
    pub cors: CorsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::for_environment(Environment::default())
    }
}

impl AppConfig {
    /// Built-in defaults for an environment
    pub fn for_environment(environment: Environment) -> Self {
        let cors = if environment.is_production() {
            CorsConfig::default()
        } else {
            CorsConfig::development()
        };
        let email = EmailConfig {
            console_output: !environment.is_production(),
            ..EmailConfig::default()
        };

        Self {
            environment,
            server: ServerConfig::default(),
            verification: VerificationConfig::default(),
            email,
            cors,
            logging: LoggingConfig::for_environment(environment),
        }
    }

    /// Load configuration for the environment named by `ENVIRONMENT`/`ENV`
    pub fn load() -> Result<Self, ConfigError> {
        let environment = Environment::from_env();
        let config = ::config::Config::builder()
            .add_source(::config::Config::try_from(&Self::for_environment(environment))?)
            .add_source(::config::File::with_name(&environment.config_file()).required(false))
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator(ENV_SEPARATOR)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("cors.allowed_origins"),
            )
            .build()?;

        Self::from_config(config)
    }

    /// Deserialize and validate an already-built `config::Config`
    pub fn from_config(config: ::config::Config) -> Result<Self, ConfigError> {
        let app_config: AppConfig = config.try_deserialize()?;
        app_config.validate()?;
        Ok(app_config)
    }

    /// Check cross-field constraints the type system cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Invalid("server.port must be non-zero".to_string()));
        }
        self.verification.validate().map_err(ConfigError::Invalid)?;
        if self.environment.is_production() {
            self.email
                .validate_for_production()
                .map_err(ConfigError::Invalid)?;
        }
        Ok(())
    }
}
