//! Route access policy registry.
//!
//! Route metadata is declared once, while routes are registered, in an
//! explicit table that the guards consult on every request. There is no
//! runtime reflection: a route's policy is looked up by its method and
//! matched path template.
//!
//! # Markers
//!
//! - [`RouteMetadata::public`]: the public-route marker (key [`IS_PUBLIC_KEY`]).
//!   Authentication is skipped entirely.
//! - [`RouteMetadata::roles`]: the role-requirement marker (key [`ROLES_KEY`]).
//!   The caller needs at least one of the listed roles.
//! - [`RouteMetadata::throttle`]: selects the rate limit bucket (key [`THROTTLE_KEY`]).
//!
//! # Attachment levels
//!
//! Metadata can be attached to a *controller* (a path prefix such as
//! `/api/admin`) or to a single *handler* (method + path template). When both
//! apply:
//!
//! - `isPublic` is OR'd across the two levels
//! - `roles` and `throttle` from the handler override the controller's
//!
//! Routes nobody registered resolve to "authenticated, no role requirement".
//!
//! # Example
//!
//! ```ignore
//! let policies = RoutePolicies::builder()
//!     .controller("/api/admin", RouteMetadata::roles(["admin"]))
//!     .handler(Method::GET, "/api/admin/audit", RouteMetadata::roles(["admin", "auditor"]))
//!     .handler(Method::GET, "/api/admin/status", RouteMetadata::public())
//!     .build();
//!
//! let policy = policies.resolve(&Method::GET, "/api/admin/stats");
//! assert_eq!(policy.required_roles, vec!["admin"]);
//! ```

use std::collections::HashMap;
use std::fmt;

use axum::http::Method;

/// Well-known metadata key of the public-route marker.
pub const IS_PUBLIC_KEY: &str = "isPublic";
/// Well-known metadata key of the role-requirement marker.
pub const ROLES_KEY: &str = "roles";
/// Well-known metadata key of the rate limit bucket selector.
pub const THROTTLE_KEY: &str = "throttle";

/// Which quota bucket a route draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RateLimitTier {
    #[default]
    General,
    /// Stricter bucket for credential-handling endpoints.
    Auth,
    Unlimited,
}

/// Metadata attached to one controller or handler.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteMetadata {
    is_public: bool,
    roles: Option<Vec<String>>,
    throttle: Option<RateLimitTier>,
}

impl RouteMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Public-route marker.
    pub fn public() -> Self {
        Self {
            is_public: true,
            ..Self::default()
        }
    }

    /// Role-requirement marker. Order is kept, duplicates are allowed, and
    /// labels are not checked against any known set.
    pub fn roles<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new().with_roles(roles)
    }

    pub fn throttle(tier: RateLimitTier) -> Self {
        Self::new().with_throttle(tier)
    }

    #[must_use]
    pub fn with_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles = Some(roles.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_throttle(mut self, tier: RateLimitTier) -> Self {
        self.throttle = Some(tier);
        self
    }

    #[must_use]
    pub fn and_public(mut self) -> Self {
        self.is_public = true;
        self
    }

    pub fn is_public(&self) -> bool {
        self.is_public
    }

    pub fn required_roles(&self) -> Option<&[String]> {
        self.roles.as_deref()
    }

    /// Folds a second attachment on the same target into this one.
    fn merge(mut self, other: RouteMetadata) -> Self {
        self.is_public |= other.is_public;
        if other.roles.is_some() {
            self.roles = other.roles;
        }
        if other.throttle.is_some() {
            self.throttle = other.throttle;
        }
        self
    }
}

/// Effective policy of a route after merging controller and handler metadata.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AccessPolicy {
    pub is_public: bool,
    /// Empty means any authenticated identity.
    pub required_roles: Vec<String>,
    pub throttle: RateLimitTier,
}

impl fmt::Display for AccessPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{IS_PUBLIC_KEY}={} {ROLES_KEY}={:?} {THROTTLE_KEY}={:?}",
            self.is_public, self.required_roles, self.throttle
        )
    }
}

/// Immutable route → metadata table, shared by all requests.
#[derive(Debug, Clone, Default)]
pub struct RoutePolicies {
    /// Sorted by prefix length, longest first.
    controllers: Vec<(String, RouteMetadata)>,
    handlers: HashMap<(Method, String), RouteMetadata>,
}

impl RoutePolicies {
    pub fn builder() -> RoutePoliciesBuilder {
        RoutePoliciesBuilder::default()
    }

    /// Resolves the effective policy for a request.
    ///
    /// `path` is the matched route template (e.g. `/api/users/{id}`), not the raw URI.
    ///
    /// Handler metadata is keyed by method. A method the route does not serve
    /// gets the default policy, so `POST /health` must authenticate before it
    /// can see the `405`.
    pub fn resolve(&self, method: &Method, path: &str) -> AccessPolicy {
        let controller = self.controller_metadata(path);
        let handler = self.handler_metadata(method, path);

        let is_public = handler.is_some_and(RouteMetadata::is_public)
            || controller.is_some_and(RouteMetadata::is_public);

        let required_roles = handler
            .and_then(|h| h.roles.clone())
            .or_else(|| controller.and_then(|c| c.roles.clone()))
            .unwrap_or_default();

        let throttle = handler
            .and_then(|h| h.throttle)
            .or_else(|| controller.and_then(|c| c.throttle))
            .unwrap_or_default();

        AccessPolicy {
            is_public,
            required_roles,
            throttle,
        }
    }

    fn handler_metadata(&self, method: &Method, path: &str) -> Option<&RouteMetadata> {
        let key = (method.clone(), path.to_string());
        match self.handlers.get(&key) {
            Some(meta) => Some(meta),
            // HEAD requests are served by GET handlers
            None if *method == Method::HEAD => self.handlers.get(&(Method::GET, key.1)),
            None => None,
        }
    }

    fn controller_metadata(&self, path: &str) -> Option<&RouteMetadata> {
        self.controllers
            .iter()
            .find(|(prefix, _)| prefix_matches(prefix, path))
            .map(|(_, meta)| meta)
    }
}

fn prefix_matches(prefix: &str, path: &str) -> bool {
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        return true;
    }
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

#[derive(Debug, Default)]
pub struct RoutePoliciesBuilder {
    controllers: HashMap<String, RouteMetadata>,
    handlers: HashMap<(Method, String), RouteMetadata>,
}

impl RoutePoliciesBuilder {
    /// Attaches metadata to every route under `prefix`.
    #[must_use]
    pub fn controller(mut self, prefix: impl Into<String>, metadata: RouteMetadata) -> Self {
        let prefix = prefix.into();
        let merged = match self.controllers.remove(&prefix) {
            Some(existing) => existing.merge(metadata),
            None => metadata,
        };
        self.controllers.insert(prefix, merged);
        self
    }

    /// Attaches metadata to a single method + path template.
    #[must_use]
    pub fn handler(mut self, method: Method, path: impl Into<String>, metadata: RouteMetadata) -> Self {
        let key = (method, path.into());
        let merged = match self.handlers.remove(&key) {
            Some(existing) => existing.merge(metadata),
            None => metadata,
        };
        self.handlers.insert(key, merged);
        self
    }

    pub fn build(self) -> RoutePolicies {
        let mut controllers: Vec<_> = self.controllers.into_iter().collect();
        controllers.sort_by(|(a, _), (b, _)| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

        RoutePolicies {
            controllers,
            handlers: self.handlers,
        }
    }
}
