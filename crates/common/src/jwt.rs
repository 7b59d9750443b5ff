//! Compact JWT format checks shared across the session gateway.
//!
//! These checks run BEFORE any base64 decoding or signature work:
//! - Size limits for DoS prevention
//! - Segment structure (`header.payload.signature`)
//! - Minimum HMAC secret length
//!
//! # Usage
//!
//! ```rust,ignore
//! use common::jwt::{check_compact_format, MAX_JWT_SIZE_BYTES};
//!
//! // Reject oversized or structurally broken tokens cheaply
//! check_compact_format(token)?;
//! ```

use thiserror::Error;

// =============================================================================
// Constants
// =============================================================================

/// Maximum allowed JWT size in bytes (8KB).
///
/// Session tokens carry five short claims and are typically 250-400 bytes.
/// Anything larger than this is rejected before base64 decode so a client
/// cannot make the gateway allocate and hash arbitrarily large inputs.
pub const MAX_JWT_SIZE_BYTES: usize = 8192; // 8KB

/// Minimum length of an HMAC-SHA256 signing secret in bytes.
///
/// Matches the HS256 output size; shorter secrets are rejected at config load.
pub const MIN_HMAC_SECRET_BYTES: usize = 32;

/// Number of dot-separated segments in a compact JWS.
const JWT_SEGMENTS: usize = 3;

// =============================================================================
// Error Types
// =============================================================================

/// Structural problems detected before a token is decoded.
///
/// Messages are generic on purpose; the specific reason is logged at debug.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JwtFormatError {
    /// Token size exceeds maximum allowed.
    #[error("The access token is malformed")]
    TokenTooLarge,

    /// Token is not `header.payload.signature` with non-empty segments.
    #[error("The access token is malformed")]
    MalformedToken,
}

// =============================================================================
// Functions
// =============================================================================

/// Check size and segment structure of a compact JWT without decoding it.
///
/// # Errors
///
/// - `TokenTooLarge` - Token exceeds [`MAX_JWT_SIZE_BYTES`]
/// - `MalformedToken` - Token does not have exactly three non-empty segments
pub fn check_compact_format(token: &str) -> Result<(), JwtFormatError> {
    if token.len() > MAX_JWT_SIZE_BYTES {
        tracing::debug!(
            target: "common.jwt",
            token_size = token.len(),
            max_size = MAX_JWT_SIZE_BYTES,
            "Token rejected: size exceeds maximum allowed"
        );
        return Err(JwtFormatError::TokenTooLarge);
    }

    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != JWT_SEGMENTS || segments.iter().any(|s| s.is_empty()) {
        tracing::debug!(
            target: "common.jwt",
            segments = segments.len(),
            "Token rejected: invalid JWT format"
        );
        return Err(JwtFormatError::MalformedToken);
    }

    Ok(())
}

/// Returns true if `secret` is long enough to sign HS256 tokens.
#[must_use]
pub fn is_strong_hmac_secret(secret: &[u8]) -> bool {
    secret.len() >= MIN_HMAC_SECRET_BYTES
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_max_jwt_size_is_8kb() {
        assert_eq!(MAX_JWT_SIZE_BYTES, 8192);
    }

    #[test]
    fn test_well_formed_token_passes() {
        assert!(check_compact_format("aGVhZGVy.cGF5bG9hZA.c2ln").is_ok());
    }

    #[test]
    fn test_wrong_segment_count_is_malformed() {
        assert_eq!(
            check_compact_format("only.two"),
            Err(JwtFormatError::MalformedToken)
        );
        assert_eq!(
            check_compact_format("a.b.c.d"),
            Err(JwtFormatError::MalformedToken)
        );
        assert_eq!(
            check_compact_format("single"),
            Err(JwtFormatError::MalformedToken)
        );
    }

    #[test]
    fn test_empty_token_is_malformed() {
        assert_eq!(check_compact_format(""), Err(JwtFormatError::MalformedToken));
    }

    #[test]
    fn test_empty_segment_is_malformed() {
        assert_eq!(
            check_compact_format(".payload.signature"),
            Err(JwtFormatError::MalformedToken)
        );
        assert_eq!(
            check_compact_format("header.payload."),
            Err(JwtFormatError::MalformedToken)
        );
    }

    #[test]
    fn test_oversized_token_rejected_before_structure_check() {
        let oversized = "a".repeat(MAX_JWT_SIZE_BYTES + 1);
        assert_eq!(
            check_compact_format(&oversized),
            Err(JwtFormatError::TokenTooLarge)
        );
    }

    #[test]
    fn test_token_at_limit_is_accepted() {
        let body = "a".repeat(MAX_JWT_SIZE_BYTES - 4);
        let token = format!("{body}.b.c");
        assert_eq!(token.len(), MAX_JWT_SIZE_BYTES);
        assert!(check_compact_format(&token).is_ok());
    }

    #[test]
    fn test_hmac_secret_strength() {
        assert!(!is_strong_hmac_secret(b"short"));
        assert!(is_strong_hmac_secret(&[7u8; MIN_HMAC_SECRET_BYTES]));
    }

    #[test]
    fn test_error_messages_are_generic() {
        assert_eq!(
            JwtFormatError::TokenTooLarge.to_string(),
            JwtFormatError::MalformedToken.to_string()
        );
    }
}
