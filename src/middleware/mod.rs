//! Request guards and extractors.
//!
//! # Modules
//!
//! - [`rate_limit`]: per-client quota tracking, runs first
//! - [`auth`]: bearer credential verification, attaches the [`Identity`](gatehouse_core::Identity)
//! - [`role`]: role requirement checks against the attached identity
//! - [`current_user`]: handler-side access to the identity
//!
//! # Guard Order
//!
//! Every request passes the guards in a fixed order:
//!
//! 1. Rate limit (rejects with `429`)
//! 2. Authentication (skipped on public routes, rejects with `401`)
//! 3. Role check (skipped on public routes, rejects with `403`)
//! 4. Handler
//!
//! The guards look up the route's policy by its matched template, so they must
//! be installed on the outermost router with [`apply`].

use axum::{Router, extract::MatchedPath, extract::Request, middleware::from_fn_with_state};

use crate::state::AppState;

pub mod auth;
pub mod current_user;
pub mod rate_limit;
pub mod role;

/// Installs the guard chain on every route of `router`.
///
/// Layers added later run earlier, hence the reversed order.
pub fn apply(router: Router<AppState>, state: &AppState) -> Router<AppState> {
    router
        .route_layer(from_fn_with_state(state.clone(), role::authorize))
        .route_layer(from_fn_with_state(state.clone(), auth::authenticate))
        .route_layer(from_fn_with_state(state.clone(), rate_limit::rate_limit))
}

/// The route template the request matched, or the raw path when unmatched.
pub(crate) fn route_path(req: &Request) -> String {
    req.extensions()
        .get::<MatchedPath>()
        .map(|matched| matched.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string())
}
