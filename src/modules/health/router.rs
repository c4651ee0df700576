use axum::{Router, http::Method, routing::get};

use crate::policy::{RateLimitTier, RouteMetadata, RoutePoliciesBuilder};
use crate::state::AppState;

use super::controller::health_check;

pub fn init_health_router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

pub fn register_health_policies(builder: RoutePoliciesBuilder) -> RoutePoliciesBuilder {
    builder.handler(
        Method::GET,
        "/health",
        RouteMetadata::public().with_throttle(RateLimitTier::Unlimited),
    )
}
