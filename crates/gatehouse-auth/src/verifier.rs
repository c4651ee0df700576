//! The credential verification seam.
//!
//! The authentication guard only depends on [`TokenVerifier`]. Verification is
//! async so that implementations backed by a remote key set can suspend while
//! fetching keys; the guard awaits it and nothing else in the request pipeline
//! runs meanwhile.

use async_trait::async_trait;
use jsonwebtoken::{DecodingKey, Validation, decode};

use gatehouse_config::JwtConfig;

use crate::claims::Claims;
use crate::jwt::{TokenError, check_claims, classify, validation};

#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// Checks signature and expiry and returns the verified claims.
    async fn verify(&self, token: &str) -> Result<Claims, TokenError>;
}

/// HS256 verifier with a decoding key prepared once at startup.
#[derive(Clone)]
pub struct JwtVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    pub fn new(jwt_config: &JwtConfig) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(jwt_config.secret.as_bytes()),
            validation: validation(jwt_config),
        }
    }
}

impl std::fmt::Debug for JwtVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtVerifier")
            .field("algorithms", &self.validation.algorithms)
            .field("leeway", &self.validation.leeway)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl TokenVerifier for JwtVerifier {
    async fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(classify)?;

        check_claims(&claims)?;
        Ok(claims)
    }
}
