use std::sync::Arc;

use gatehouse_auth::{JwtVerifier, TokenVerifier};
use gatehouse_config::{AppConfig, ConfigError, ServerConfig};

use crate::middleware::rate_limit::RateLimiters;
use crate::policy::RoutePolicies;
use crate::router::route_policies;

/// Read-only state shared by every request.
///
/// The only mutable part is the quota tracker inside [`RateLimiters`], which
/// synchronises itself.
#[derive(Clone)]
pub struct AppState {
    pub policies: Arc<RoutePolicies>,
    pub verifier: Arc<dyn TokenVerifier>,
    pub rate_limiters: RateLimiters,
    pub server_config: ServerConfig,
}

impl AppState {
    pub fn new(
        policies: RoutePolicies,
        verifier: Arc<dyn TokenVerifier>,
        rate_limiters: RateLimiters,
        server_config: ServerConfig,
    ) -> Self {
        Self {
            policies: Arc::new(policies),
            verifier,
            rate_limiters,
            server_config,
        }
    }
}

/// Builds the state for the application's own routes.
pub fn init_app_state(config: &AppConfig) -> Result<AppState, ConfigError> {
    Ok(AppState::new(
        route_policies(),
        Arc::new(JwtVerifier::new(&config.jwt)),
        RateLimiters::new(&config.rate_limit)?,
        config.server.clone(),
    ))
}
