//! # Gatehouse Config
//!
//! Configuration types for the gatehouse service, loaded from environment variables:
//!
//! - [`jwt`]: bearer token verification settings
//! - [`rate_limit`]: quota tracker settings
//! - [`server`]: listener address and CORS origins
//! - [`logging`]: log level and output format
//!
//! Unlike the other settings, `JWT_SECRET` has no default. A process without a
//! verification secret must refuse to start, so [`AppConfig::from_env`] returns
//! a [`ConfigError`] instead of falling back.
//!
//! # Example
//!
//! ```ignore
//! use gatehouse_config::AppConfig;
//!
//! dotenvy::dotenv().ok();
//! let config = AppConfig::from_env()?;
//! ```

pub mod error;
pub mod jwt;
pub mod logging;
pub mod rate_limit;
pub mod server;

// Re-export commonly used types at crate root
pub use error::ConfigError;
pub use jwt::JwtConfig;
pub use logging::{LogFormat, LoggingConfig};
pub use rate_limit::RateLimitConfig;
pub use server::ServerConfig;

/// All configuration needed to run the service.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub jwt: JwtConfig,
    pub rate_limit: RateLimitConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_vars<F>(vars: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            jwt: JwtConfig::from_vars(&vars)?,
            rate_limit: RateLimitConfig::from_vars(&vars)?,
            server: ServerConfig::from_vars(&vars),
            logging: LoggingConfig::from_vars(&vars),
        })
    }
}

/// Reads `key` and parses it, falling back to `default` when unset or unparsable.
pub(crate) fn parse_or<F, T>(vars: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    vars(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
