//! Per-client request quotas.
//!
//! Two keyed token buckets, one for general traffic and a stricter one for
//! auth endpoints. Clients are keyed by IP, taken from `x-forwarded-for`,
//! `x-real-ip` or `forwarded` when a proxy sets them and from the peer address
//! otherwise. Over-quota requests are rejected before authentication runs.

use std::net::IpAddr;
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http,
    middleware::Next,
    response::Response,
};
use governor::{
    DefaultKeyedRateLimiter, RateLimiter,
    clock::Clock,
};
use tower_governor::{
    GovernorError,
    key_extractor::{KeyExtractor, SmartIpKeyExtractor},
};

use gatehouse_config::{ConfigError, RateLimitConfig};
use gatehouse_core::AppError;

use crate::middleware::route_path;
use crate::policy::RateLimitTier;
use crate::state::AppState;

type KeyedLimiter = DefaultKeyedRateLimiter<IpAddr>;

/// The quota tracker. Cheap to clone; clones share counters.
#[derive(Clone)]
pub struct RateLimiters {
    general: Arc<KeyedLimiter>,
    auth: Arc<KeyedLimiter>,
}

impl RateLimiters {
    pub fn new(config: &RateLimitConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            general: Arc::new(RateLimiter::keyed(config.general_quota()?)),
            auth: Arc::new(RateLimiter::keyed(config.auth_quota()?)),
        })
    }

    fn bucket(&self, tier: RateLimitTier) -> Option<&KeyedLimiter> {
        match tier {
            RateLimitTier::General => Some(self.general.as_ref()),
            RateLimitTier::Auth => Some(self.auth.as_ref()),
            RateLimitTier::Unlimited => None,
        }
    }

    /// Consumes one token for the request's client from the `tier` bucket.
    pub fn check<B>(&self, tier: RateLimitTier, req: &http::Request<B>) -> Result<(), GovernorError> {
        match self.bucket(tier) {
            Some(limiter) => check(limiter, req),
            None => Ok(()),
        }
    }

    /// Drops state for clients whose buckets have refilled.
    pub fn retain_recent(&self) {
        self.general.retain_recent();
        self.auth.retain_recent();
    }

    /// Number of clients currently tracked across both buckets.
    pub fn tracked_clients(&self) -> usize {
        self.general.len() + self.auth.len()
    }
}

impl std::fmt::Debug for RateLimiters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiters")
            .field("general_clients", &self.general.len())
            .field("auth_clients", &self.auth.len())
            .finish()
    }
}

fn check<B>(limiter: &KeyedLimiter, req: &http::Request<B>) -> Result<(), GovernorError> {
    let key = SmartIpKeyExtractor.extract(req)?;

    limiter
        .check_key(&key)
        .map_err(|not_until| GovernorError::TooManyRequests {
            wait_time: not_until.wait_time_from(limiter.clock().now()).as_secs(),
            headers: None,
        })
}

/// Middleware enforcing the route's quota tier.
pub async fn rate_limit(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = route_path(&req);
    let policy = state.policies.resolve(req.method(), &path);

    if let Err(err) = state.rate_limiters.check(policy.throttle, &req) {
        if let GovernorError::TooManyRequests { wait_time, .. } = &err {
            tracing::warn!(
                path = %path,
                tier = ?policy.throttle,
                retry_after_secs = wait_time,
                "rate limit exceeded"
            );
        }
        return Err(err.into());
    }

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;

    use axum::{body::Body, extract::ConnectInfo};

    fn request_from(ip: [u8; 4]) -> http::Request<Body> {
        let mut req = http::Request::builder()
            .uri("/api/profile")
            .body(Body::empty())
            .unwrap();
        req.extensions_mut()
            .insert(ConnectInfo(SocketAddr::from((ip, 40000))));
        req
    }

    fn tight_config() -> RateLimitConfig {
        RateLimitConfig {
            general_per_second: 1,
            general_burst_size: 2,
            auth_per_second: 1,
            auth_burst_size: 1,
        }
    }

    #[test]
    fn test_burst_then_reject() {
        let limiters = RateLimiters::new(&tight_config()).unwrap();
        let req = request_from([10, 0, 0, 1]);

        assert!(limiters.check(RateLimitTier::General, &req).is_ok());
        assert!(limiters.check(RateLimitTier::General, &req).is_ok());
        assert!(matches!(
            limiters.check(RateLimitTier::General, &req),
            Err(GovernorError::TooManyRequests { .. })
        ));
    }

    #[test]
    fn test_clients_have_separate_buckets() {
        let limiters = RateLimiters::new(&tight_config()).unwrap();

        assert!(limiters.check(RateLimitTier::Auth, &request_from([10, 0, 0, 1])).is_ok());
        assert!(limiters.check(RateLimitTier::Auth, &request_from([10, 0, 0, 1])).is_err());
        assert!(limiters.check(RateLimitTier::Auth, &request_from([10, 0, 0, 2])).is_ok());
    }

    #[test]
    fn test_tiers_have_separate_buckets() {
        let limiters = RateLimiters::new(&tight_config()).unwrap();
        let req = request_from([10, 0, 0, 3]);

        assert!(limiters.check(RateLimitTier::Auth, &req).is_ok());
        assert!(limiters.check(RateLimitTier::Auth, &req).is_err());
        assert!(limiters.check(RateLimitTier::General, &req).is_ok());
    }

    #[test]
    fn test_unlimited_never_rejects() {
        let limiters = RateLimiters::new(&tight_config()).unwrap();
        let req = request_from([10, 0, 0, 4]);

        for _ in 0..10 {
            assert!(limiters.check(RateLimitTier::Unlimited, &req).is_ok());
        }
    }

    #[test]
    fn test_forwarded_header_is_the_key() {
        let limiters = RateLimiters::new(&tight_config()).unwrap();
        let forwarded = |ip: &str| {
            http::Request::builder()
                .header("x-forwarded-for", ip)
                .body(Body::empty())
                .unwrap()
        };

        assert!(limiters.check(RateLimitTier::Auth, &forwarded("192.0.2.1")).is_ok());
        assert!(limiters.check(RateLimitTier::Auth, &forwarded("192.0.2.1")).is_err());
        assert!(limiters.check(RateLimitTier::Auth, &forwarded("192.0.2.2")).is_ok());
    }

    #[test]
    fn test_missing_client_address_is_an_error() {
        let limiters = RateLimiters::new(&tight_config()).unwrap();
        let req = http::Request::builder().body(Body::empty()).unwrap();

        assert!(matches!(
            limiters.check(RateLimitTier::General, &req),
            Err(GovernorError::UnableToExtractKey)
        ));
    }

    #[test]
    fn test_wait_time_comes_from_limiter_clock() {
        let limiters = RateLimiters::new(&tight_config()).unwrap();
        let req = request_from([10, 0, 0, 6]);
        let _ = limiters.check(RateLimitTier::Auth, &req);

        match limiters.check(RateLimitTier::Auth, &req) {
            Err(GovernorError::TooManyRequests { wait_time, headers }) => {
                assert!(wait_time <= 1);
                assert!(headers.is_none());
            }
            other => panic!("expected TooManyRequests, got {other:?}"),
        }
    }

    #[test]
    fn test_over_quota_maps_to_rate_limited() {
        let limiters = RateLimiters::new(&tight_config()).unwrap();
        let req = request_from([10, 0, 0, 5]);
        let _ = limiters.check(RateLimitTier::Auth, &req);

        let err = limiters.check(RateLimitTier::Auth, &req).unwrap_err();
        assert!(matches!(AppError::from(err), AppError::RateLimited));
    }
}
