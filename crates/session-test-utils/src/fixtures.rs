//! Pre-configured test data and a ready-to-use gateway harness.

use crate::clock::ManualClock;
use crate::mock_cache::InMemorySessionCache;
use axum::http::header::{COOKIE, USER_AGENT};
use axum::http::{HeaderMap, HeaderValue};
use session_gateway::config::GatewayConfig;
use session_gateway::gateway::AuthenticationGateway;
use std::collections::HashMap;
use std::sync::Arc;

/// Signing secret used by every fixture (exactly the minimum length).
pub const TEST_SIGNING_SECRET: &str = "test-signing-secret-0123456789ab";

/// Token lifetime used by [`test_config`].
pub const TEST_TOKEN_TTL_SECONDS: i64 = 3600;

/// Renewal window used by [`test_config`].
pub const TEST_RENEWAL_WINDOW_SECONDS: i64 = 600;

/// Starting instant of [`GatewayHarness`] clocks.
pub const TEST_NOW: i64 = 1_700_000_000;

/// A typical browser `User-Agent`.
pub const TEST_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) Firefox/128.0";

/// Environment variables for [`test_config`].
pub fn test_vars() -> HashMap<String, String> {
    HashMap::from([
        (
            "SESSION_SIGNING_SECRET".to_string(),
            TEST_SIGNING_SECRET.to_string(),
        ),
        (
            "SESSION_TOKEN_TTL_SECONDS".to_string(),
            TEST_TOKEN_TTL_SECONDS.to_string(),
        ),
        (
            "SESSION_RENEWAL_WINDOW_SECONDS".to_string(),
            TEST_RENEWAL_WINDOW_SECONDS.to_string(),
        ),
    ])
}

/// Gateway configuration with test secret, 1h ttl and 10 minute window.
pub fn test_config() -> GatewayConfig {
    GatewayConfig::from_vars(&test_vars()).expect("test config should load")
}

/// Request headers carrying an optional token cookie and `User-Agent`.
pub fn request_headers(token: Option<&str>, user_agent: Option<&str>) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if let Some(token) = token {
        headers.insert(
            COOKIE,
            HeaderValue::from_str(&format!("access_token={token}"))
                .expect("token should be a valid header value"),
        );
    }
    if let Some(user_agent) = user_agent {
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(user_agent).expect("user agent should be a valid header value"),
        );
    }
    headers
}

/// Gateway wired to an in-memory cache and a manual clock.
pub struct GatewayHarness {
    pub gateway: Arc<AuthenticationGateway>,
    pub cache: InMemorySessionCache,
    pub clock: ManualClock,
}

impl Default for GatewayHarness {
    fn default() -> Self {
        Self::new()
    }
}

impl GatewayHarness {
    /// Harness with [`test_config`] and the clock at [`TEST_NOW`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    /// Harness with a custom configuration.
    #[must_use]
    pub fn with_config(config: GatewayConfig) -> Self {
        let cache = InMemorySessionCache::new();
        let clock = ManualClock::new(TEST_NOW);
        let gateway = Arc::new(AuthenticationGateway::new(
            config,
            Arc::new(cache.clone()),
            Arc::new(clock.clone()),
        ));
        Self {
            gateway,
            cache,
            clock,
        }
    }

    /// Cache key under which `account`'s authoritative token lives.
    pub fn cache_key(&self, account: &str) -> String {
        self.gateway.config().cache_key(account)
    }

    /// Authoritative token currently cached for `account`.
    pub fn cached_token(&self, account: &str) -> Option<String> {
        self.cache.value(&self.cache_key(account))
    }
}
