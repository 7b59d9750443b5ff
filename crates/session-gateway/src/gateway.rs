//! Per-request session decision.
//!
//! [`AuthenticationGateway::authenticate`] walks a fixed sequence of checks,
//! each short-circuiting with exactly one [`GatewayError`]:
//!
//! 1. Extract the token from the token cookie (`NoToken`)
//! 2. Verify and decode it (`InvalidSignature` / `Malformed`)
//! 3. Hard expiry (`ExpiredOrInvalidSession`)
//! 4. Device fingerprint from `User-Agent` (`ExpiredOrInvalidSession`, same
//!    outcome as expiry)
//! 5. Authority: the cache entry for the account must equal the presented
//!    token (`NotAuthoritative`)
//! 6. Sliding renewal when the token is inside the renewal window: mint a
//!    fresh token, overwrite the cache entry, hand back new cookies
//!
//! Nothing is written to the cache before step 6, so every rejection leaves
//! cache and cookies untouched. A cache failure at step 5 or 6 fails closed
//! with `CacheUnavailable`.
//!
//! # Concurrency
//!
//! The gateway holds no per-request mutable state. Two concurrent requests for
//! the same account inside the renewal window may both renew; the later cache
//! write wins and the other client's fresh cookie is rejected on its next
//! request. No lock serializes renewal per account.

use crate::auth::{
    derive_fingerprint, fingerprint_from_headers, Claims, SessionIdentity, TokenCodec,
};
use crate::cache::SessionCache;
use crate::clock::Clock;
use crate::config::GatewayConfig;
use crate::cookies::{extract_cookie, SessionCookies};
use crate::errors::GatewayError;
use crate::observability::metrics;
use axum::http::{HeaderMap, HeaderValue};
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::instrument;

/// A token that was just issued and made authoritative.
#[derive(Clone)]
pub struct IssuedSession {
    /// The signed token string.
    pub token: String,
    /// Claims carried by `token`.
    pub claims: Claims,
    /// Token and display-name cookies for the response.
    pub cookies: SessionCookies,
    /// `Set-Cookie` header values for `cookies`, token cookie first.
    pub set_cookie_headers: Vec<HeaderValue>,
}

impl fmt::Debug for IssuedSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IssuedSession")
            .field("token", &"[REDACTED]")
            .field("claims", &self.claims)
            .finish_non_exhaustive()
    }
}

/// A request that passed every check.
#[derive(Debug, Clone)]
pub struct Authorization {
    /// Claims to attach to the request; the renewed claims if a renewal happened.
    pub claims: Claims,
    /// Present when the request triggered a sliding renewal.
    pub renewed: Option<IssuedSession>,
}

/// Validates session tokens against the authoritative cache and renews them.
pub struct AuthenticationGateway {
    config: GatewayConfig,
    codec: TokenCodec,
    cache: Arc<dyn SessionCache>,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for AuthenticationGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthenticationGateway")
            .field("config", &self.config)
            .field("codec", &self.codec)
            .finish_non_exhaustive()
    }
}

impl AuthenticationGateway {
    /// Create a gateway over an injected session cache and clock.
    pub fn new(config: GatewayConfig, cache: Arc<dyn SessionCache>, clock: Arc<dyn Clock>) -> Self {
        let codec = TokenCodec::new(&config.signing_secret);
        Self {
            config,
            codec,
            cache,
            clock,
        }
    }

    /// The configuration this gateway was built with.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Decide whether the request carrying `headers` may proceed.
    ///
    /// # Errors
    ///
    /// Returns the single [`GatewayError`] of the first failing check.
    #[instrument(skip_all, name = "session.gateway.authenticate")]
    pub async fn authenticate(&self, headers: &HeaderMap) -> Result<Authorization, GatewayError> {
        let result = self.decide(headers).await;

        match &result {
            Ok(authorization) if authorization.renewed.is_some() => {
                metrics::record_decision("renewed");
            }
            Ok(_) => metrics::record_decision("authorized"),
            Err(e) => {
                tracing::debug!(target: "session.gateway", outcome = e.kind(), "Request rejected");
                metrics::record_decision(e.kind());
            }
        }

        result
    }

    async fn decide(&self, headers: &HeaderMap) -> Result<Authorization, GatewayError> {
        let token = extract_cookie(headers, &self.config.token_cookie_name)
            .ok_or(GatewayError::NoToken)?;

        let claims = self.codec.parse(&token)?;

        let now = self.clock.now();
        if claims.is_expired(now) {
            tracing::debug!(
                target: "session.gateway",
                exp = claims.expires_at,
                now = now,
                "Token expired"
            );
            return Err(GatewayError::ExpiredOrInvalidSession);
        }

        if claims.device_fingerprint != fingerprint_from_headers(headers) {
            tracing::debug!(target: "session.gateway", "Device fingerprint mismatch");
            return Err(GatewayError::ExpiredOrInvalidSession);
        }

        let cache_key = self.config.cache_key(&claims.account);
        let current = self.cache_get(&cache_key).await?;
        if current.as_deref() != Some(token.as_str()) {
            tracing::debug!(
                target: "session.gateway",
                cache_entry_present = current.is_some(),
                "Token is not the authoritative session token"
            );
            return Err(GatewayError::NotAuthoritative);
        }

        if claims.within_renewal_window(now, self.config.renewal_window_seconds) {
            let renewed = self.issue(&claims.identity(), now).await?;
            metrics::record_renewal();
            tracing::info!(
                target: "session.gateway",
                old_exp = claims.expires_at,
                new_exp = renewed.claims.expires_at,
                "Session token renewed"
            );
            return Ok(Authorization {
                claims: renewed.claims.clone(),
                renewed: Some(renewed),
            });
        }

        Ok(Authorization {
            claims,
            renewed: None,
        })
    }

    /// Issue a token for a freshly authenticated client and make it authoritative.
    ///
    /// This is the primitive a login flow calls once credentials check out.
    /// Any token previously issued to `account` stops being accepted.
    ///
    /// # Errors
    ///
    /// - `CacheUnavailable` if the cache write fails
    /// - `Internal` if the token cannot be signed
    #[instrument(skip_all, name = "session.gateway.establish")]
    pub async fn establish_session(
        &self,
        account: &str,
        user_agent: Option<&str>,
        display_name: &str,
    ) -> Result<IssuedSession, GatewayError> {
        let identity = SessionIdentity {
            account: account.to_string(),
            device_fingerprint: derive_fingerprint(user_agent),
            display_name: display_name.to_string(),
        };
        let issued = self.issue(&identity, self.clock.now()).await?;
        tracing::info!(
            target: "session.gateway",
            exp = issued.claims.expires_at,
            "Session established"
        );
        Ok(issued)
    }

    /// Drop the authoritative entry for `account`, invalidating all of its tokens.
    ///
    /// # Errors
    ///
    /// Returns `CacheUnavailable` if the cache delete fails.
    #[instrument(skip_all, name = "session.gateway.revoke")]
    pub async fn revoke_session(&self, account: &str) -> Result<(), GatewayError> {
        let cache_key = self.config.cache_key(account);
        let started = Instant::now();
        let result = self.cache.delete(&cache_key).await;
        metrics::record_cache_operation("delete", result.is_ok(), started.elapsed());
        result?;

        tracing::info!(target: "session.gateway", "Session revoked");
        Ok(())
    }

    /// Mint a token for `identity`, prepare its cookies, then overwrite the cache entry.
    ///
    /// Cookies are rendered before the cache write so a rendering failure
    /// cannot leave a cache entry that no client holds.
    async fn issue(
        &self,
        identity: &SessionIdentity,
        now: i64,
    ) -> Result<IssuedSession, GatewayError> {
        let minted = self
            .codec
            .mint(identity, now, self.config.token_ttl_seconds)?;

        let cookies = SessionCookies::new(&self.config, &minted.token, &identity.display_name);
        let set_cookie_headers = cookies.to_header_values().map_err(|e| {
            tracing::error!(target: "session.gateway", error = %e, "Failed to render session cookies");
            GatewayError::Internal(format!("Failed to render session cookies: {e}"))
        })?;

        let cache_key = self.config.cache_key(&identity.account);
        self.cache_set(&cache_key, &minted.token).await?;

        Ok(IssuedSession {
            token: minted.token,
            claims: minted.claims,
            cookies,
            set_cookie_headers,
        })
    }

    async fn cache_get(&self, key: &str) -> Result<Option<String>, GatewayError> {
        let started = Instant::now();
        let result = self.cache.get(key).await;
        metrics::record_cache_operation("get", result.is_ok(), started.elapsed());
        result.map_err(|e| {
            tracing::warn!(target: "session.gateway", error = %e, "Session cache read failed");
            GatewayError::from(e)
        })
    }

    async fn cache_set(&self, key: &str, token: &str) -> Result<(), GatewayError> {
        let started = Instant::now();
        let result = self
            .cache
            .set(key, token, self.config.cache_ttl_seconds())
            .await;
        metrics::record_cache_operation("set", result.is_ok(), started.elapsed());
        result.map_err(|e| {
            tracing::warn!(target: "session.gateway", error = %e, "Session cache write failed");
            GatewayError::from(e)
        })
    }
}
