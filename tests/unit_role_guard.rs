use gatehouse::middleware::auth::AuthUser;
use gatehouse::middleware::role::{check_roles, roles_satisfy};
use gatehouse_auth::Claims;
use gatehouse_core::{AppError, Identity};

fn create_test_identity(roles: &[&str]) -> Identity {
    let claims = Claims {
        sub: "u1".to_string(),
        email: "test@example.com".to_string(),
        tenant_id: None,
        roles: roles.iter().map(|r| r.to_string()).collect(),
        exp: 9999999999,
        iat: 1234567890,
        iss: None,
        aud: None,
    };
    claims.into_identity()
}

fn required(roles: &[&str]) -> Vec<String> {
    roles.iter().map(|r| r.to_string()).collect()
}

#[test]
fn test_check_roles_exact_match() {
    for role in ["admin", "auditor", "user"] {
        let identity = create_test_identity(&[role]);
        assert!(check_roles(Some(&identity), &required(&[role])).is_ok());
    }
}

#[test]
fn test_check_roles_no_match() {
    let identity = create_test_identity(&["user"]);
    assert!(matches!(
        check_roles(Some(&identity), &required(&["admin"])),
        Err(AppError::Forbidden)
    ));
}

#[test]
fn test_any_of_not_all_of() {
    let requirement = required(&["admin", "auditor", "user"]);

    let identity = create_test_identity(&["auditor"]);
    assert!(roles_satisfy(Some(&identity), &requirement));

    let identity = create_test_identity(&["guest"]);
    assert!(!roles_satisfy(Some(&identity), &requirement));
}

#[test]
fn test_empty_identity_roles() {
    let identity = create_test_identity(&[]);
    assert!(roles_satisfy(Some(&identity), &[]));
    assert!(!roles_satisfy(Some(&identity), &required(&["user"])));
}

#[test]
fn test_duplicate_requirements_are_harmless() {
    let identity = create_test_identity(&["admin"]);
    assert!(roles_satisfy(Some(&identity), &required(&["admin", "admin"])));
}

#[test]
fn test_tenant_does_not_affect_roles() {
    let identity = create_test_identity(&["admin"]).with_tenant("other-tenant");
    assert!(roles_satisfy(Some(&identity), &required(&["admin"])));
}

#[test]
fn test_auth_user_role_helpers() {
    let auth_user = AuthUser(create_test_identity(&["admin", "user"]));
    assert!(auth_user.has_any_role(&["admin"]));
    assert!(!auth_user.has_any_role(&["auditor"]));
    assert_eq!(auth_user.tenant_id(), None);
}
