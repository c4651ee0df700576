//! # Gatehouse
//!
//! Request-time authentication and authorization for an axum service.
//!
//! For every inbound request the guard chain decides whether the caller must
//! present a bearer token, who the caller is, whether the caller's roles
//! satisfy the route's policy, and whether the caller is over its request
//! quota.
//!
//! ## Architecture
//!
//! ```text
//! crates/
//! ├── gatehouse-core/    # Identity model, AppError and the error envelope
//! ├── gatehouse-config/  # Environment configuration
//! └── gatehouse-auth/    # Claims, token issue/verify, TokenVerifier seam
//! src/
//! ├── policy.rs          # Route policy registry (public + role markers)
//! ├── middleware/        # Rate limit, authentication, role guards, accessor
//! ├── modules/           # Feature modules (health, profile, admin, auth)
//! ├── router.rs          # Main application router
//! ├── state.rs           # Shared application state
//! ├── logging.rs         # Request logging and subscriber setup
//! └── cli.rs             # `serve` and `issue-token`
//! ```
//!
//! ## Route Policies
//!
//! Policies are registered next to the routes they describe, at controller
//! (path prefix) or handler (method + path template) level:
//!
//! ```ignore
//! use gatehouse::policy::{RoutePolicies, RouteMetadata};
//!
//! let policies = RoutePolicies::builder()
//!     .controller("/api/admin", RouteMetadata::roles(["admin"]))
//!     .handler(Method::GET, "/api/admin/status", RouteMetadata::public())
//!     .build();
//! ```
//!
//! Routes with no registration require an authenticated caller and no role.
//!
//! ## Error Responses
//!
//! Every rejection renders the same envelope:
//!
//! ```json
//! { "statusCode": 401, "message": "Invalid or missing credentials", "error": "Unauthorized" }
//! ```
//!
//! | Status | Cause |
//! |--------|-------|
//! | 401 | Missing, malformed, expired or forged token |
//! | 403 | Valid token, none of the required roles |
//! | 429 | Client over its request quota |
//!
//! ## Quick Start
//!
//! ```bash
//! JWT_SECRET=your-secure-secret-key
//! gatehouse issue-token --sub u1 --email a@b.com --role admin
//! gatehouse serve
//! ```

pub mod cli;
pub mod logging;
pub mod middleware;
pub mod modules;
pub mod policy;
pub mod router;
pub mod state;

// Re-export workspace crates for convenience
pub use gatehouse_auth;
pub use gatehouse_config;
pub use gatehouse_core;
