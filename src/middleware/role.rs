//! Role-based authorization.
//!
//! Runs after [`authenticate`](crate::middleware::auth::authenticate) and
//! compares the route's required roles against the attached identity.
//! A caller passes when it holds ANY of the listed roles. An empty list
//! admits every authenticated caller.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use gatehouse_core::{AppError, Identity};

use crate::middleware::route_path;
use crate::state::AppState;

/// Returns true if `identity` satisfies `required`.
///
/// No identity only satisfies an empty requirement.
pub fn roles_satisfy(identity: Option<&Identity>, required: &[String]) -> bool {
    if required.is_empty() {
        return true;
    }

    identity.is_some_and(|identity| identity.has_any_role(required))
}

/// Same as [`roles_satisfy`], as a guard result.
pub fn check_roles(identity: Option<&Identity>, required: &[String]) -> Result<(), AppError> {
    if roles_satisfy(identity, required) {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

/// Middleware running the role guard.
pub async fn authorize(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = route_path(&req);
    let policy = state.policies.resolve(req.method(), &path);

    if policy.is_public {
        return Ok(next.run(req).await);
    }

    let identity = req.extensions().get::<Identity>();
    if let Err(err) = check_roles(identity, &policy.required_roles) {
        tracing::warn!(
            path = %path,
            subject = identity.map(|i| i.id.as_str()).unwrap_or("-"),
            required = ?policy.required_roles,
            "caller lacks required role"
        );
        return Err(err);
    }

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn required(roles: &[&str]) -> Vec<String> {
        roles.iter().map(|r| r.to_string()).collect()
    }

    #[test]
    fn test_empty_requirement_passes() {
        assert!(roles_satisfy(None, &[]));
        assert!(roles_satisfy(Some(&Identity::new("u1", "a@b.com")), &[]));
    }

    #[test]
    fn test_any_of_semantics() {
        let user = Identity::new("u1", "a@b.com").with_roles(["auditor"]);
        assert!(roles_satisfy(Some(&user), &required(&["admin", "auditor"])));
        assert!(!roles_satisfy(Some(&user), &required(&["admin"])));
    }

    #[test]
    fn test_missing_identity_denied() {
        assert!(!roles_satisfy(None, &required(&["admin"])));
        assert!(matches!(
            check_roles(None, &required(&["admin"])),
            Err(AppError::Forbidden)
        ));
    }

    #[test]
    fn test_roles_are_case_sensitive() {
        let user = Identity::new("u1", "a@b.com").with_roles(["Admin"]);
        assert!(!roles_satisfy(Some(&user), &required(&["admin"])));
    }
}
