use axum::{Router, routing::post};

use crate::policy::{RateLimitTier, RouteMetadata, RoutePoliciesBuilder};
use crate::state::AppState;

use super::controller::token_check;

pub fn init_auth_router() -> Router<AppState> {
    Router::new().route("/token-check", post(token_check))
}

pub fn register_auth_policies(builder: RoutePoliciesBuilder) -> RoutePoliciesBuilder {
    builder.controller(
        "/api/auth",
        RouteMetadata::throttle(RateLimitTier::Auth).and_public(),
    )
}
