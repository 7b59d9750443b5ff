//! Session token claims.
//!
//! Contains the claims carried inside a signed session token. The account and
//! display name are redacted in Debug output to keep them out of logs.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Claims signed into every session token.
///
/// Timestamps are Unix epoch seconds. A well-formed token always satisfies
/// `expires_at > issued_at`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Account the session belongs to - redacted in Debug output.
    #[serde(rename = "sub")]
    pub account: String,

    /// Issued-at timestamp (Unix epoch seconds).
    #[serde(rename = "iat")]
    pub issued_at: i64,

    /// Expiration timestamp (Unix epoch seconds).
    #[serde(rename = "exp")]
    pub expires_at: i64,

    /// Lower-cased User-Agent of the client the token was issued to.
    #[serde(rename = "ua")]
    pub device_fingerprint: String,

    /// Human readable name echoed back in the display-name cookie.
    #[serde(rename = "name")]
    pub display_name: String,

    /// Random per-issue id, so two tokens minted for the same identity in
    /// the same second still differ.
    #[serde(rename = "jti")]
    pub token_id: String,
}

impl fmt::Debug for Claims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Claims")
            .field("account", &"[REDACTED]")
            .field("issued_at", &self.issued_at)
            .field("expires_at", &self.expires_at)
            .field("device_fingerprint", &self.device_fingerprint)
            .field("display_name", &"[REDACTED]")
            .field("token_id", &self.token_id)
            .finish()
    }
}

impl Claims {
    /// Hard expiry: the token is dead once `expires_at <= now`.
    #[must_use]
    pub fn is_expired(&self, now: i64) -> bool {
        self.expires_at <= now
    }

    /// True when the token is still alive but will expire within `window_seconds`.
    #[must_use]
    pub fn within_renewal_window(&self, now: i64, window_seconds: i64) -> bool {
        !self.is_expired(now) && self.expires_at - now <= window_seconds
    }

    /// The identity portion of the claims, used to reissue a token.
    #[must_use]
    pub fn identity(&self) -> SessionIdentity {
        SessionIdentity {
            account: self.account.clone(),
            device_fingerprint: self.device_fingerprint.clone(),
            display_name: self.display_name.clone(),
        }
    }
}

/// Who a token is issued to, without any timing information.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionIdentity {
    pub account: String,
    pub device_fingerprint: String,
    pub display_name: String,
}

impl fmt::Debug for SessionIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionIdentity")
            .field("account", &"[REDACTED]")
            .field("device_fingerprint", &self.device_fingerprint)
            .field("display_name", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn claims(issued_at: i64, expires_at: i64) -> Claims {
        Claims {
            account: "alice".to_string(),
            issued_at,
            expires_at,
            device_fingerprint: "fp-1".to_string(),
            display_name: "Alice".to_string(),
            token_id: "jti-1".to_string(),
        }
    }

    #[test]
    fn test_claims_debug_redacts_account_and_name() {
        let debug_str = format!("{:?}", claims(0, 10));

        assert!(debug_str.contains("[REDACTED]"));
        assert!(!debug_str.contains("alice"));
        assert!(!debug_str.contains("Alice"));
        assert!(debug_str.contains("fp-1"));
    }

    #[test]
    fn test_serialized_claim_names() {
        let json = serde_json::to_value(claims(100, 200)).unwrap();

        assert_eq!(json["sub"], "alice");
        assert_eq!(json["iat"], 100);
        assert_eq!(json["exp"], 200);
        assert_eq!(json["ua"], "fp-1");
        assert_eq!(json["name"], "Alice");
        assert_eq!(json["jti"], "jti-1");
    }

    #[test]
    fn test_is_expired_boundary() {
        let c = claims(0, 1000);
        assert!(!c.is_expired(999));
        assert!(c.is_expired(1000));
        assert!(c.is_expired(1001));
    }

    #[test]
    fn test_within_renewal_window() {
        let c = claims(0, 1000);

        assert!(!c.within_renewal_window(0, 600));
        assert!(!c.within_renewal_window(399, 600));
        assert!(c.within_renewal_window(400, 600));
        assert!(c.within_renewal_window(995, 600));
    }

    #[test]
    fn test_expired_token_is_never_in_renewal_window() {
        let c = claims(0, 1000);
        assert!(!c.within_renewal_window(1000, 600));
        assert!(!c.within_renewal_window(5000, 600));
    }

    #[test]
    fn test_zero_window_never_renews_live_token() {
        let c = claims(0, 1000);
        assert!(!c.within_renewal_window(999, 0));
    }

    #[test]
    fn test_identity_drops_timestamps() {
        let identity = claims(5, 10).identity();
        assert_eq!(identity.account, "alice");
        assert_eq!(identity.device_fingerprint, "fp-1");
        assert_eq!(identity.display_name, "Alice");
    }
}
