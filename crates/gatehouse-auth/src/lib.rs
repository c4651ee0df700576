//! # Gatehouse Auth
//!
//! Bearer credential handling for the gatehouse enforcement layer.
//!
//! This crate provides:
//!
//! - [`claims`]: the claim set carried by access tokens and its mapping to an
//!   [`Identity`](gatehouse_core::Identity)
//! - [`jwt`]: HS256 token issuance and verification helpers
//! - [`verifier`]: the async [`TokenVerifier`] seam used by the authentication
//!   guard, and its [`JwtVerifier`] implementation
//!
//! # Example
//!
//! ```ignore
//! use gatehouse_auth::{JwtVerifier, TokenVerifier, create_access_token};
//! use gatehouse_config::JwtConfig;
//! use gatehouse_core::Identity;
//!
//! let config = JwtConfig::from_env()?;
//! let token = create_access_token(&Identity::new("u1", "a@b.com"), &config)?;
//!
//! let verifier = JwtVerifier::new(&config);
//! let identity = verifier.verify(&token).await?.into_identity();
//! ```

pub mod claims;
pub mod jwt;
pub mod verifier;

// Re-export commonly used types at crate root
pub use claims::Claims;
pub use jwt::{TokenError, create_access_token, encode_claims, verify_token};
pub use verifier::{JwtVerifier, TokenVerifier};
