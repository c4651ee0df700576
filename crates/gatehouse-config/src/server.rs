//! Listener and CORS configuration.
//!
//! - `HOST` (default `0.0.0.0`), `PORT` (default `3000`)
//! - `ALLOWED_ORIGINS`: comma separated list of CORS origins

use crate::parse_or;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://localhost:5173".to_string(),
            ],
        }
    }
}

impl ServerConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_vars(&|key: &str| std::env::var(key).ok())
    }

    pub fn from_vars<F>(vars: &F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let allowed_origins = match vars("ALLOWED_ORIGINS") {
            Some(raw) => raw
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            None => defaults.allowed_origins,
        };

        Self {
            host: vars("HOST").unwrap_or(defaults.host),
            port: parse_or(vars, "PORT", defaults.port),
            allowed_origins,
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
