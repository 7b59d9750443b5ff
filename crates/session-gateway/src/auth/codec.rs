//! Session token signing and verification.
//!
//! Tokens are compact JWS strings signed with HMAC-SHA256 over a shared
//! secret. [`TokenCodec::parse`] verifies the signature and decodes the claims
//! but deliberately performs NO expiry check, so callers can tell a forged
//! token apart from an expired one.
//!
//! # Security
//!
//! - Tokens are size- and shape-checked BEFORE any decoding (DoS prevention)
//! - Only HS256 is accepted; any other `alg` header is treated as malformed
//! - The signing secret never appears in Debug output
//! - Every minted token carries a random `jti`, so a reissue for the same
//!   identity within the same second still replaces the cached token

use crate::auth::claims::{Claims, SessionIdentity};
use common::jwt::check_compact_format;
use common::secret::{ExposeSecret, SecretString};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Errors produced while minting or parsing session tokens.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// The token could not be decoded (structure, base64, JSON, algorithm, claim invariants).
    #[error("Malformed token")]
    Malformed,

    /// The token decoded but its signature does not match the shared secret.
    #[error("Invalid token signature")]
    InvalidSignature,

    /// A token was requested with a lifetime that cannot satisfy `exp > iat`.
    #[error("Invalid token lifetime: {0} seconds")]
    InvalidTtl(i64),

    /// The signing backend failed.
    #[error("Token signing failed: {0}")]
    Signing(String),
}

/// A freshly minted token together with the claims it carries.
#[derive(Clone, PartialEq, Eq)]
pub struct MintedToken {
    pub token: String,
    pub claims: Claims,
}

impl fmt::Debug for MintedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MintedToken")
            .field("token", &"[REDACTED]")
            .field("claims", &self.claims)
            .finish()
    }
}

/// Stateless HS256 signer/verifier for session tokens.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithm", &"HS256")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

impl TokenCodec {
    /// Create a codec bound to the shared signing secret.
    pub fn new(secret: &SecretString) -> Self {
        let secret_bytes = secret.expose_secret().as_bytes();

        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is the caller's decision; the codec only proves authenticity.
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        Self {
            encoding_key: EncodingKey::from_secret(secret_bytes),
            decoding_key: DecodingKey::from_secret(secret_bytes),
            validation,
        }
    }

    /// Sign a new token for `identity`, valid from `now` for `ttl_seconds`.
    ///
    /// # Errors
    ///
    /// - `InvalidTtl` if `ttl_seconds` is not positive or overflows the timestamp
    /// - `Signing` if the JWT encoder fails
    pub fn mint(
        &self,
        identity: &SessionIdentity,
        now: i64,
        ttl_seconds: i64,
    ) -> Result<MintedToken, TokenError> {
        if ttl_seconds <= 0 {
            return Err(TokenError::InvalidTtl(ttl_seconds));
        }
        let expires_at = now
            .checked_add(ttl_seconds)
            .ok_or(TokenError::InvalidTtl(ttl_seconds))?;

        let claims = Claims {
            account: identity.account.clone(),
            issued_at: now,
            expires_at,
            device_fingerprint: identity.device_fingerprint.clone(),
            display_name: identity.display_name.clone(),
            token_id: Uuid::new_v4().to_string(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| {
                tracing::error!(target: "session.codec", error = %e, "Token signing failed");
                TokenError::Signing(e.to_string())
            })?;

        Ok(MintedToken { token, claims })
    }

    /// Verify the signature of `token` and decode its claims.
    ///
    /// Expiry is NOT checked here.
    ///
    /// # Errors
    ///
    /// - `InvalidSignature` if the signature does not verify under the shared secret
    /// - `Malformed` for every other decoding failure
    pub fn parse(&self, token: &str) -> Result<Claims, TokenError> {
        check_compact_format(token).map_err(|e| {
            tracing::debug!(target: "session.codec", error = ?e, "Token failed format check");
            TokenError::Malformed
        })?;

        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            if matches!(e.kind(), ErrorKind::InvalidSignature) {
                tracing::debug!(target: "session.codec", "Token signature mismatch");
                TokenError::InvalidSignature
            } else {
                tracing::debug!(target: "session.codec", error = %e, "Token decode failed");
                TokenError::Malformed
            }
        })?;

        let claims = data.claims;
        if claims.expires_at <= claims.issued_at {
            tracing::debug!(
                target: "session.codec",
                iat = claims.issued_at,
                exp = claims.expires_at,
                "Token rejected: expiry not after issue time"
            );
            return Err(TokenError::Malformed);
        }

        Ok(claims)
    }
}
