use axum::{Router, http::Method, routing::get};

use crate::policy::{RouteMetadata, RoutePoliciesBuilder};
use crate::state::AppState;

use super::controller::{get_audit, get_stats, get_status};

pub fn init_admin_router() -> Router<AppState> {
    Router::new()
        .route("/stats", get(get_stats))
        .route("/audit", get(get_audit))
        .route("/status", get(get_status))
}

pub fn register_admin_policies(builder: RoutePoliciesBuilder) -> RoutePoliciesBuilder {
    builder
        .controller("/api/admin", RouteMetadata::roles(["admin"]))
        .handler(
            Method::GET,
            "/api/admin/audit",
            RouteMetadata::roles(["admin", "auditor"]),
        )
        .handler(Method::GET, "/api/admin/status", RouteMetadata::public())
}
