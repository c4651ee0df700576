use axum::{Router, http::Method, routing::get};

use crate::policy::{RouteMetadata, RoutePoliciesBuilder};
use crate::state::AppState;

use super::controller::{get_profile, get_profile_email, get_profile_tenant, whoami};

pub fn init_profile_router() -> Router<AppState> {
    Router::new()
        .route("/profile", get(get_profile))
        .route("/profile/email", get(get_profile_email))
        .route("/profile/tenant", get(get_profile_tenant))
        .route("/whoami", get(whoami))
}

/// Profile routes need any authenticated caller, which is the default policy.
/// Only `/whoami` is opened up.
pub fn register_profile_policies(builder: RoutePoliciesBuilder) -> RoutePoliciesBuilder {
    builder.handler(Method::GET, "/api/whoami", RouteMetadata::public())
}
