use thiserror::Error;

/// Fatal startup configuration problems.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("JWT_SECRET must be set to a non-empty value")]
    MissingSecret,

    #[error("{key} must be greater than zero")]
    ZeroValue { key: &'static str },
}
