//! JWT (JSON Web Token) utilities.
//!
//! Tokens are HS256-signed with the configured secret. Verification checks the
//! signature and `exp` (with the configured leeway), plus `iss`/`aud` when the
//! config names them.
//!
//! # Example
//!
//! ```ignore
//! use gatehouse_auth::{create_access_token, verify_token};
//! use gatehouse_config::JwtConfig;
//!
//! let config = JwtConfig::from_env()?;
//! let token = create_access_token(&identity, &config)?;
//! let claims = verify_token(&token, &config)?;
//! ```

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use thiserror::Error;

use gatehouse_config::JwtConfig;
use gatehouse_core::{AppError, Identity};

use crate::claims::Claims;

/// Why a token could not be issued or accepted.
///
/// The variants exist for logging only. Every verification failure reaches
/// the client as the same `401`.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token has expired")]
    Expired,

    #[error("token signature is invalid")]
    BadSignature,

    #[error("token claims are invalid: {0}")]
    InvalidClaims(String),

    #[error("token is malformed: {0}")]
    Malformed(#[source] jsonwebtoken::errors::Error),

    #[error("failed to encode token: {0}")]
    Encode(#[source] jsonwebtoken::errors::Error),
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Encode(e) => AppError::unhandled(e),
            _ => AppError::Unauthenticated,
        }
    }
}

/// Builds the validation rules for `jwt_config`.
pub(crate) fn validation(jwt_config: &JwtConfig) -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = jwt_config.leeway;

    // A configured issuer or audience must also be present in the token,
    // otherwise jsonwebtoken skips the comparison.
    if let Some(issuer) = &jwt_config.issuer {
        validation.set_issuer(&[issuer]);
        validation.required_spec_claims.insert("iss".to_string());
    }

    match &jwt_config.audience {
        Some(audience) => {
            validation.set_audience(&[audience]);
            validation.required_spec_claims.insert("aud".to_string());
        }
        None => validation.validate_aud = false,
    }

    validation
}

pub(crate) fn classify(err: jsonwebtoken::errors::Error) -> TokenError {
    match err.kind() {
        ErrorKind::ExpiredSignature => TokenError::Expired,
        ErrorKind::InvalidSignature => TokenError::BadSignature,
        ErrorKind::InvalidIssuer | ErrorKind::InvalidAudience | ErrorKind::ImmatureSignature => {
            TokenError::InvalidClaims(err.to_string())
        }
        ErrorKind::MissingRequiredClaim(claim) => {
            TokenError::InvalidClaims(format!("missing required claim `{claim}`"))
        }
        _ => TokenError::Malformed(err),
    }
}

/// Rejects claim sets that decoded but cannot identify a caller.
pub(crate) fn check_claims(claims: &Claims) -> Result<(), TokenError> {
    if claims.sub.trim().is_empty() {
        return Err(TokenError::InvalidClaims("empty `sub`".to_string()));
    }
    if claims.email.trim().is_empty() {
        return Err(TokenError::InvalidClaims("empty `email`".to_string()));
    }
    Ok(())
}

/// Signs an arbitrary claim set.
///
/// # Errors
///
/// Returns [`TokenError::Encode`] if encoding fails.
pub fn encode_claims(claims: &Claims, jwt_config: &JwtConfig) -> Result<String, TokenError> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(TokenError::Encode)
}

/// Creates an access token for `identity`, valid for `access_token_expiry` seconds.
///
/// Issuer and audience from the config are stamped into the token so that it
/// passes this service's own verification.
pub fn create_access_token(identity: &Identity, jwt_config: &JwtConfig) -> Result<String, TokenError> {
    let mut claims = Claims::for_identity(identity, jwt_config.access_token_expiry);
    claims.iss = jwt_config.issuer.clone();
    claims.aud = jwt_config.audience.clone();

    encode_claims(&claims, jwt_config)
}

/// Verifies an access token and returns its claims.
///
/// # Errors
///
/// Returns a [`TokenError`] if:
/// - The token signature is invalid
/// - The token has expired
/// - The token is malformed or lacks required claims
pub fn verify_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, TokenError> {
    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &validation(jwt_config),
    )
    .map(|data| data.claims)
    .map_err(classify)?;

    check_claims(&claims)?;
    Ok(claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_test_jwt_config() -> JwtConfig {
        JwtConfig::with_secret("test-secret-key-at-least-32-characters-long")
    }

    fn test_identity() -> Identity {
        Identity::new("u1", "a@b.com").with_roles(["admin", "user"])
    }

    #[test]
    fn test_create_access_token_success() {
        let config = get_test_jwt_config();
        let token = create_access_token(&test_identity(), &config).unwrap();
        assert!(!token.is_empty());
    }

    #[test]
    fn test_verify_token_success() {
        let config = get_test_jwt_config();
        let token = create_access_token(&test_identity(), &config).unwrap();

        let claims = verify_token(&token, &config).unwrap();
        assert_eq!(claims.sub, "u1");
        assert_eq!(claims.email, "a@b.com");
        assert_eq!(claims.roles, vec!["admin".to_string(), "user".to_string()]);
    }

    #[test]
    fn test_verify_token_invalid() {
        let config = get_test_jwt_config();
        let result = verify_token("invalid-token", &config);
        assert!(matches!(result, Err(TokenError::Malformed(_))));
    }

    #[test]
    fn test_verify_token_wrong_secret() {
        let config = get_test_jwt_config();
        let token = create_access_token(&test_identity(), &config).unwrap();

        let wrong_config = JwtConfig::with_secret("different-secret-key-at-least-32-characters");
        let result = verify_token(&token, &wrong_config);
        assert!(matches!(result, Err(TokenError::BadSignature)));
    }

    #[test]
    fn test_verify_token_expired() {
        let config = get_test_jwt_config();
        let claims = Claims::for_identity(&test_identity(), -3600);
        let token = encode_claims(&claims, &config).unwrap();

        let result = verify_token(&token, &config);
        assert!(matches!(result, Err(TokenError::Expired)));
    }

    #[test]
    fn test_verify_token_empty_subject() {
        let config = get_test_jwt_config();
        let mut claims = Claims::for_identity(&test_identity(), 3600);
        claims.sub = String::new();
        let token = encode_claims(&claims, &config).unwrap();

        assert!(matches!(
            verify_token(&token, &config),
            Err(TokenError::InvalidClaims(_))
        ));
    }

    #[test]
    fn test_issuer_is_enforced_when_configured() {
        let config = get_test_jwt_config();
        let token = create_access_token(&test_identity(), &config).unwrap();

        let mut strict = config.clone();
        strict.issuer = Some("gatehouse".to_string());
        assert!(verify_token(&token, &strict).is_err());

        let issued = create_access_token(&test_identity(), &strict).unwrap();
        assert!(verify_token(&issued, &strict).is_ok());
    }

    #[test]
    fn test_audience_is_enforced_when_configured() {
        let mut config = get_test_jwt_config();
        config.audience = Some("api".to_string());

        let claims = Claims::for_identity(&test_identity(), 3600);
        let without_aud = encode_claims(&claims, &config).unwrap();
        assert!(matches!(
            verify_token(&without_aud, &config),
            Err(TokenError::InvalidClaims(_))
        ));

        let mut other = claims.clone();
        other.aud = Some("someone-else".to_string());
        let wrong_aud = encode_claims(&other, &config).unwrap();
        assert!(verify_token(&wrong_aud, &config).is_err());

        let issued = create_access_token(&test_identity(), &config).unwrap();
        assert!(verify_token(&issued, &config).is_ok());
    }

    #[test]
    fn test_missing_issuer_rejected_when_configured() {
        let mut config = get_test_jwt_config();
        config.issuer = Some("gatehouse".to_string());

        let claims = Claims::for_identity(&test_identity(), 3600);
        let token = encode_claims(&claims, &config).unwrap();
        assert!(matches!(
            verify_token(&token, &config),
            Err(TokenError::InvalidClaims(_))
        ));
    }

    #[test]
    fn test_audience_ignored_when_not_configured() {
        let config = get_test_jwt_config();
        let mut claims = Claims::for_identity(&test_identity(), 3600);
        claims.aud = Some("someone-else".to_string());
        let token = encode_claims(&claims, &config).unwrap();

        assert!(verify_token(&token, &config).is_ok());
    }

    #[test]
    fn test_token_error_maps_to_unauthenticated() {
        assert!(matches!(
            AppError::from(TokenError::Expired),
            AppError::Unauthenticated
        ));
        assert!(matches!(
            AppError::from(TokenError::BadSignature),
            AppError::Unauthenticated
        ));
    }
}
