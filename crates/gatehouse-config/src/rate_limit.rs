//! Rate limiting configuration for the quota tracker.
//!
//! The tracker itself is a keyed `governor` token bucket; this module only
//! describes its shape.
//!
//! # Configuration
//!
//! - `RATE_LIMIT_GENERAL_PER_SECOND`: Requests per second for general endpoints (default: 2)
//! - `RATE_LIMIT_GENERAL_BURST_SIZE`: Burst size for general endpoints (default: 30)
//! - `RATE_LIMIT_AUTH_PER_SECOND`: Requests per second for auth endpoints (default: 10)
//! - `RATE_LIMIT_AUTH_BURST_SIZE`: Burst size for auth endpoints (default: 5)
//!
//! # Rate Limiting Strategy
//!
//! - Tokens are added at the configured rate (per second)
//! - Each request consumes one token
//! - Burst size defines the maximum tokens that can accumulate
//! - Requests are rejected when no tokens are available
//!
//! # Example
//!
//! ```ignore
//! use gatehouse_config::RateLimitConfig;
//! use governor::RateLimiter;
//!
//! let config = RateLimitConfig::from_env()?;
//! let limiter = RateLimiter::keyed(config.general_quota()?);
//! ```

use std::num::NonZeroU32;

use governor::Quota;

use crate::error::ConfigError;
use crate::parse_or;

/// Rate limit configuration for the API.
///
/// Auth-sensitive endpoints get their own, stricter bucket so that credential
/// probing cannot borrow budget from ordinary traffic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Requests per second for general endpoints.
    pub general_per_second: u32,

    /// Burst size for general endpoints.
    pub general_burst_size: u32,

    /// Requests per second for auth endpoints.
    pub auth_per_second: u32,

    /// Burst size for auth endpoints.
    pub auth_burst_size: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            general_per_second: 2,
            general_burst_size: 30,
            auth_per_second: 10,
            auth_burst_size: 5,
        }
    }
}

impl RateLimitConfig {
    /// Creates a new `RateLimitConfig` from environment variables.
    ///
    /// Unset or unparsable variables fall back to the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroValue`] if any value is zero.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&|key: &str| std::env::var(key).ok())
    }

    pub fn from_vars<F>(vars: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let config = Self {
            general_per_second: parse_or(
                vars,
                "RATE_LIMIT_GENERAL_PER_SECOND",
                defaults.general_per_second,
            ),
            general_burst_size: parse_or(
                vars,
                "RATE_LIMIT_GENERAL_BURST_SIZE",
                defaults.general_burst_size,
            ),
            auth_per_second: parse_or(vars, "RATE_LIMIT_AUTH_PER_SECOND", defaults.auth_per_second),
            auth_burst_size: parse_or(vars, "RATE_LIMIT_AUTH_BURST_SIZE", defaults.auth_burst_size),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.general_quota()?;
        self.auth_quota()?;
        Ok(())
    }

    /// Token bucket quota for general API endpoints.
    pub fn general_quota(&self) -> Result<Quota, ConfigError> {
        quota(
            self.general_per_second,
            "RATE_LIMIT_GENERAL_PER_SECOND",
            self.general_burst_size,
            "RATE_LIMIT_GENERAL_BURST_SIZE",
        )
    }

    /// Token bucket quota for auth endpoints.
    pub fn auth_quota(&self) -> Result<Quota, ConfigError> {
        quota(
            self.auth_per_second,
            "RATE_LIMIT_AUTH_PER_SECOND",
            self.auth_burst_size,
            "RATE_LIMIT_AUTH_BURST_SIZE",
        )
    }
}

fn quota(
    per_second: u32,
    per_second_key: &'static str,
    burst: u32,
    burst_key: &'static str,
) -> Result<Quota, ConfigError> {
    let per_second = NonZeroU32::new(per_second).ok_or(ConfigError::ZeroValue {
        key: per_second_key,
    })?;
    let burst = NonZeroU32::new(burst).ok_or(ConfigError::ZeroValue { key: burst_key })?;

    Ok(Quota::per_second(per_second).allow_burst(burst))
}
