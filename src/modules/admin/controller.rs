use axum::{Json, extract::State};
use serde::Serialize;
use tracing::instrument;

use crate::middleware::auth::AuthUser;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub requested_by: String,
    pub tracked_clients: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditResponse {
    pub requested_by: String,
    pub roles: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

/// Requires `admin`.
#[instrument(skip_all, fields(subject = %auth_user.id()))]
pub async fn get_stats(State(state): State<AppState>, auth_user: AuthUser) -> Json<StatsResponse> {
    Json(StatsResponse {
        requested_by: auth_user.id().to_string(),
        tracked_clients: state.rate_limiters.tracked_clients(),
    })
}

/// Requires `admin` or `auditor`.
pub async fn get_audit(auth_user: AuthUser) -> Json<AuditResponse> {
    Json(AuditResponse {
        requested_by: auth_user.id().to_string(),
        roles: auth_user.0.roles.iter().cloned().collect(),
    })
}

pub async fn get_status() -> Json<StatusResponse> {
    Json(StatusResponse { status: "operational" })
}
