//! Logging configuration.
//!
//! - `LOG_LEVEL`: default filter level for the service's own targets (default: `info`)
//! - `LOG_FORMAT`: `pretty` (default) or `json`

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl LoggingConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_vars(&|key: &str| std::env::var(key).ok())
    }

    pub fn from_vars<F>(vars: &F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let format = match vars("LOG_FORMAT").as_deref().map(str::trim) {
            Some(f) if f.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        Self {
            level: vars("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            format,
        }
    }
}
