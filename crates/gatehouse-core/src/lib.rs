//! # Gatehouse Core
//!
//! Foundational types shared by every gatehouse crate:
//!
//! - [`identity`]: the request-scoped [`Identity`] of an authenticated caller
//!   and the [`IdentityField`] selectors used by the current-user accessor
//! - [`errors`]: the [`AppError`] taxonomy and the uniform
//!   `{ statusCode, message, error }` response envelope
//!
//! # Example
//!
//! ```ignore
//! use gatehouse_core::{AppError, Identity};
//!
//! let identity = Identity::new("u1", "a@b.com").with_roles(["admin"]);
//! if !identity.has_any_role(&["admin"]) {
//!     return Err(AppError::Forbidden);
//! }
//! ```

pub mod errors;
pub mod identity;

// Re-export commonly used types at crate root
pub use errors::{AppError, ErrorEnvelope};
pub use identity::{Identity, IdentityField, IdentityValue, UnknownIdentityField};
