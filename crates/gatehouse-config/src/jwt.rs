//! Bearer token verification configuration.
//!
//! # Environment Variables
//!
//! - `JWT_SECRET`: HMAC secret used to verify (and, for the CLI, sign) tokens. Required.
//! - `JWT_ACCESS_EXPIRY`: lifetime in seconds of tokens minted by `issue-token` (default: 3600)
//! - `JWT_ISSUER`: expected `iss` claim, validated only when set
//! - `JWT_AUDIENCE`: expected `aud` claim, validated only when set
//! - `JWT_LEEWAY`: clock skew tolerance in seconds for `exp` (default: 60)

use crate::error::ConfigError;
use crate::parse_or;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expiry: i64,
    pub issuer: Option<String>,
    pub audience: Option<String>,
    pub leeway: u64,
}

impl JwtConfig {
    /// Loads the config from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingSecret`] when `JWT_SECRET` is unset or blank.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&|key: &str| std::env::var(key).ok())
    }

    pub fn from_vars<F>(vars: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = vars("JWT_SECRET")
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::MissingSecret)?;

        Ok(Self {
            secret,
            access_token_expiry: parse_or(vars, "JWT_ACCESS_EXPIRY", 3600), // 1 hour
            issuer: vars("JWT_ISSUER").filter(|s| !s.is_empty()),
            audience: vars("JWT_AUDIENCE").filter(|s| !s.is_empty()),
            leeway: parse_or(vars, "JWT_LEEWAY", 60),
        })
    }

    /// Config with only a secret set, everything else at its default.
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            access_token_expiry: 3600,
            issuer: None,
            audience: None,
            leeway: 60,
        }
    }
}
