//! JWT claim structure for access tokens.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use gatehouse_core::Identity;

/// JWT claims for access tokens.
///
/// # Fields
///
/// - `sub`: subject (caller id)
/// - `email`: caller's email address
/// - `tenantId`: tenant scope, absent for tenant-less callers
/// - `roles`: granted role labels (treated as empty when absent)
/// - `exp` / `iat`: expiry and issued-at, Unix seconds
/// - `iss` / `aud`: optional issuer and audience, validated only when configured
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    #[serde(
        rename = "tenantId",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub tenant_id: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    pub exp: usize,
    #[serde(default)]
    pub iat: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
}

impl Claims {
    /// Claims for `identity`, issued now and valid for `ttl_seconds`.
    ///
    /// A negative ttl yields an already expired token, which tests rely on.
    pub fn for_identity(identity: &Identity, ttl_seconds: i64) -> Self {
        let now = Utc::now().timestamp();
        let exp = (now + ttl_seconds).max(0) as usize;

        Self {
            sub: identity.id.clone(),
            email: identity.email.clone(),
            tenant_id: identity.tenant_id.clone(),
            roles: identity.roles.iter().cloned().collect(),
            exp,
            iat: now as usize,
            iss: None,
            aud: None,
        }
    }

    /// Maps verified claims onto the request identity.
    ///
    /// subject → id, email → email, tenantId → tenant_id, roles → roles.
    pub fn into_identity(self) -> Identity {
        let mut identity = Identity::new(self.sub, self.email).with_roles(self.roles);
        identity.tenant_id = self.tenant_id;
        identity
    }
}
