//! Authentication guard.
//!
//! For every request to a non-public route, resolves the bearer credential
//! into an [`Identity`] and attaches it to the request extensions. Public
//! routes pass through untouched and never carry an identity.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};

use gatehouse_auth::TokenVerifier;
use gatehouse_core::{AppError, Identity};

use crate::middleware::route_path;
use crate::state::AppState;

/// Why no token could be read from the request. Logged, never rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialError {
    MissingHeader,
    Malformed,
}

impl CredentialError {
    pub fn as_str(&self) -> &'static str {
        match self {
            CredentialError::MissingHeader => "missing authorization header",
            CredentialError::Malformed => "malformed authorization header",
        }
    }
}

/// Extracts the token from `Authorization: Bearer <token>`.
///
/// The scheme is matched case-insensitively.
pub fn bearer_token(headers: &HeaderMap) -> Result<String, CredentialError> {
    if !headers.contains_key(header::AUTHORIZATION) {
        return Err(CredentialError::MissingHeader);
    }

    headers
        .typed_get::<Authorization<Bearer>>()
        .map(|auth| auth.token().trim().to_string())
        .filter(|token| !token.is_empty())
        .ok_or(CredentialError::Malformed)
}

/// Resolves the request's credential to an identity.
///
/// Every failure collapses to [`AppError::Unauthenticated`]; the specific
/// reason only reaches the logs.
pub async fn resolve_identity(
    headers: &HeaderMap,
    verifier: &dyn TokenVerifier,
    path: &str,
) -> Result<Identity, AppError> {
    let token = bearer_token(headers).map_err(|reason| {
        tracing::debug!(path = %path, reason = reason.as_str(), "credential rejected");
        AppError::Unauthenticated
    })?;

    let claims = verifier.verify(&token).await.map_err(|err| {
        tracing::warn!(path = %path, reason = %err, "token verification failed");
        AppError::from(err)
    })?;

    Ok(claims.into_identity())
}

/// Middleware running the authentication guard.
///
/// Install with `from_fn_with_state`; see [`crate::middleware::apply`] for the
/// required ordering relative to the role guard.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = route_path(&req);
    let policy = state.policies.resolve(req.method(), &path);

    if policy.is_public {
        tracing::trace!(path = %path, policy = %policy, "public route, authentication skipped");
        return Ok(next.run(req).await);
    }

    let identity = resolve_identity(req.headers(), state.verifier.as_ref(), &path).await?;

    tracing::debug!(
        path = %path,
        subject = %identity.id,
        tenant = identity.tenant_id.as_deref().unwrap_or("-"),
        "caller authenticated"
    );

    req.extensions_mut().insert(identity);
    Ok(next.run(req).await)
}

/// Extractor that requires an authenticated caller.
///
/// Reuses the identity attached by [`authenticate`] when present, otherwise
/// resolves the credential itself. Useful on routes outside the guarded router.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Identity);

impl AuthUser {
    /// Check if the caller has any of the specified roles
    pub fn has_any_role<S: AsRef<str>>(&self, roles: &[S]) -> bool {
        self.0.has_any_role(roles)
    }

    pub fn id(&self) -> &str {
        &self.0.id
    }

    pub fn email(&self) -> &str {
        &self.0.email
    }

    /// The caller's tenant (None for tenant-less callers)
    pub fn tenant_id(&self) -> Option<&str> {
        self.0.tenant_id.as_deref()
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(identity) = parts.extensions.get::<Identity>() {
            return Ok(AuthUser(identity.clone()));
        }

        let path = parts.uri.path().to_string();
        let identity = resolve_identity(&parts.headers, state.verifier.as_ref(), &path).await?;
        Ok(AuthUser(identity))
    }
}
