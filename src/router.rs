use axum::http::{HeaderValue, Method};
use axum::{Router, middleware as axum_middleware};
use tower_http::cors::CorsLayer;

use crate::logging::logging_middleware;
use crate::middleware;
use crate::modules::admin::router::{init_admin_router, register_admin_policies};
use crate::modules::auth::router::{init_auth_router, register_auth_policies};
use crate::modules::health::router::{init_health_router, register_health_policies};
use crate::modules::profile::router::{init_profile_router, register_profile_policies};
use crate::policy::RoutePolicies;
use crate::state::AppState;

/// Access policies for every route [`init_router`] mounts.
pub fn route_policies() -> RoutePolicies {
    let builder = RoutePolicies::builder();
    let builder = register_health_policies(builder);
    let builder = register_profile_policies(builder);
    let builder = register_admin_policies(builder);
    let builder = register_auth_policies(builder);
    builder.build()
}

pub fn init_router(state: AppState) -> Router {
    let routes = Router::new().merge(init_health_router()).nest(
        "/api",
        Router::new()
            .merge(init_profile_router())
            .nest("/admin", init_admin_router())
            .nest("/auth", init_auth_router()),
    );

    middleware::apply(routes, &state)
        .with_state(state.clone())
        .layer({
            let allowed_origins: Vec<HeaderValue> = state
                .server_config
                .allowed_origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(allowed_origins)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::PATCH,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([
                    axum::http::header::AUTHORIZATION,
                    axum::http::header::CONTENT_TYPE,
                    axum::http::header::ACCEPT,
                ])
                .allow_credentials(true)
        })
        .layer(axum_middleware::from_fn(logging_middleware))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_policies() {
        let policies = route_policies();

        let health = policies.resolve(&Method::GET, "/health");
        assert!(health.is_public);

        let profile = policies.resolve(&Method::GET, "/api/profile");
        assert!(!profile.is_public);
        assert!(profile.required_roles.is_empty());

        let stats = policies.resolve(&Method::GET, "/api/admin/stats");
        assert_eq!(stats.required_roles, vec!["admin".to_string()]);

        let audit = policies.resolve(&Method::GET, "/api/admin/audit");
        assert_eq!(
            audit.required_roles,
            vec!["admin".to_string(), "auditor".to_string()]
        );

        assert!(policies.resolve(&Method::GET, "/api/admin/status").is_public);
        assert!(policies.resolve(&Method::POST, "/api/auth/token-check").is_public);
    }
}
