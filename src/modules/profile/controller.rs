use axum::{Json, http::Extensions};
use serde::Serialize;
use tracing::instrument;

use gatehouse_core::{Identity, IdentityField};

use crate::middleware::current_user::{CurrentUser, CurrentUserValue, current_user};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantResponse {
    pub tenant_id: Option<String>,
    pub tenantless: bool,
}

/// The authenticated caller's identity.
#[instrument(skip_all)]
pub async fn get_profile(CurrentUser(identity): CurrentUser) -> Json<Option<Identity>> {
    Json(identity)
}

/// A single field of the caller's identity.
pub async fn get_profile_email(extensions: Extensions) -> Json<Option<String>> {
    let email = current_user(&extensions, Some(IdentityField::Email))
        .and_then(|value| value.as_str())
        .map(str::to_string);

    Json(email)
}

pub async fn get_profile_tenant(extensions: Extensions) -> Json<TenantResponse> {
    let tenant_id = current_user(&extensions, Some(IdentityField::TenantId))
        .and_then(|value| value.as_str())
        .map(str::to_string);

    Json(TenantResponse {
        tenantless: tenant_id.is_none(),
        tenant_id,
    })
}

/// Public route: returns the identity when one is attached, `null` otherwise.
///
/// Public routes skip authentication, so this is always `null` unless the
/// route is reconfigured as protected.
pub async fn whoami(extensions: Extensions) -> Json<serde_json::Value> {
    let body = match current_user(&extensions, None) {
        Some(CurrentUserValue::Identity(identity)) => {
            serde_json::to_value(identity).unwrap_or(serde_json::Value::Null)
        }
        _ => serde_json::Value::Null,
    };

    Json(body)
}
