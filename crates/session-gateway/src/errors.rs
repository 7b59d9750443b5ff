//! Session gateway error types.
//!
//! Every rejection is terminal for the request. Token failures map to 401,
//! a session cache outage maps to 503 (fail closed). Client-facing messages
//! are generic; the actual reason is logged server-side.

use crate::auth::TokenError;
use crate::cache::CacheError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// One typed rejection per failure kind of the per-request decision.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// No token cookie on the request.
    #[error("No session token")]
    NoToken,

    /// The token could not be decoded.
    #[error("Malformed session token")]
    Malformed,

    /// The token signature does not verify.
    #[error("Invalid session token signature")]
    InvalidSignature,

    /// The token is past its expiry, or was issued to a different device.
    #[error("Session expired or invalid")]
    ExpiredOrInvalidSession,

    /// The token is not the account's current authoritative token.
    #[error("Session token is no longer authoritative")]
    NotAuthoritative,

    /// The session cache could not be read or written.
    #[error("Session cache unavailable: {0}")]
    CacheUnavailable(String),

    /// Token issuance failed for a reason unrelated to the request.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            GatewayError::NoToken
            | GatewayError::Malformed
            | GatewayError::InvalidSignature
            | GatewayError::ExpiredOrInvalidSession
            | GatewayError::NotAuthoritative => 401,
            GatewayError::CacheUnavailable(_) => 503,
            GatewayError::Internal(_) => 500,
        }
    }

    /// Stable, bounded label used for metrics and error codes.
    pub fn kind(&self) -> &'static str {
        match self {
            GatewayError::NoToken => "no_token",
            GatewayError::Malformed => "malformed",
            GatewayError::InvalidSignature => "invalid_signature",
            GatewayError::ExpiredOrInvalidSession => "expired_or_invalid_session",
            GatewayError::NotAuthoritative => "not_authoritative",
            GatewayError::CacheUnavailable(_) => "cache_unavailable",
            GatewayError::Internal(_) => "internal",
        }
    }
}

impl From<TokenError> for GatewayError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Malformed => GatewayError::Malformed,
            TokenError::InvalidSignature => GatewayError::InvalidSignature,
            TokenError::InvalidTtl(_) | TokenError::Signing(_) => {
                GatewayError::Internal(err.to_string())
            }
        }
    }
}

impl From<CacheError> for GatewayError {
    fn from(err: CacheError) -> Self {
        match err {
            CacheError::Unavailable(reason) => GatewayError::CacheUnavailable(reason),
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            GatewayError::NoToken => (
                StatusCode::UNAUTHORIZED,
                "NO_TOKEN",
                "Restricted content, please log in".to_string(),
            ),
            GatewayError::Malformed | GatewayError::InvalidSignature => (
                StatusCode::UNAUTHORIZED,
                "INVALID_TOKEN",
                "Invalid session token".to_string(),
            ),
            GatewayError::ExpiredOrInvalidSession | GatewayError::NotAuthoritative => (
                StatusCode::UNAUTHORIZED,
                "SESSION_EXPIRED",
                "Session has expired, please log in again".to_string(),
            ),
            GatewayError::CacheUnavailable(reason) => {
                tracing::warn!(target: "session.availability", reason = %reason, "Session cache unavailable");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "SERVICE_UNAVAILABLE",
                    "Service temporarily unavailable".to_string(),
                )
            }
            GatewayError::Internal(reason) => {
                tracing::error!(target: "session.gateway", reason = %reason, "Internal gateway error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let error_response = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };

        let mut response = (status, Json(error_response)).into_response();

        if status == StatusCode::UNAUTHORIZED {
            if let Ok(header_value) = "Cookie realm=\"session\"".parse() {
                response
                    .headers_mut()
                    .insert("WWW-Authenticate", header_value);
            }
        }

        response
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use axum::body::Body;
    use http_body_util::BodyExt;

    async fn read_body_json(body: Body) -> serde_json::Value {
        let bytes = body.collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(GatewayError::NoToken.status_code(), 401);
        assert_eq!(GatewayError::Malformed.status_code(), 401);
        assert_eq!(GatewayError::InvalidSignature.status_code(), 401);
        assert_eq!(GatewayError::ExpiredOrInvalidSession.status_code(), 401);
        assert_eq!(GatewayError::NotAuthoritative.status_code(), 401);
        assert_eq!(
            GatewayError::CacheUnavailable("down".to_string()).status_code(),
            503
        );
        assert_eq!(GatewayError::Internal("boom".to_string()).status_code(), 500);
    }

    #[test]
    fn test_token_error_conversion() {
        assert_eq!(
            GatewayError::from(TokenError::Malformed),
            GatewayError::Malformed
        );
        assert_eq!(
            GatewayError::from(TokenError::InvalidSignature),
            GatewayError::InvalidSignature
        );
        assert!(matches!(
            GatewayError::from(TokenError::InvalidTtl(0)),
            GatewayError::Internal(_)
        ));
    }

    #[test]
    fn test_cache_error_conversion() {
        assert_eq!(
            GatewayError::from(CacheError::Unavailable("refused".to_string())),
            GatewayError::CacheUnavailable("refused".to_string())
        );
    }

    #[test]
    fn test_kinds_are_distinct() {
        let kinds = [
            GatewayError::NoToken.kind(),
            GatewayError::Malformed.kind(),
            GatewayError::InvalidSignature.kind(),
            GatewayError::ExpiredOrInvalidSession.kind(),
            GatewayError::NotAuthoritative.kind(),
            GatewayError::CacheUnavailable(String::new()).kind(),
            GatewayError::Internal(String::new()).kind(),
        ];
        let unique: std::collections::HashSet<_> = kinds.iter().collect();
        assert_eq!(unique.len(), kinds.len());
    }

    #[tokio::test]
    async fn test_into_response_unauthorized_has_www_authenticate() {
        let response = GatewayError::NotAuthoritative.into_response();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().contains_key("WWW-Authenticate"));

        let body = read_body_json(response.into_body()).await;
        assert_eq!(body["error"]["code"], "SESSION_EXPIRED");
    }

    #[tokio::test]
    async fn test_into_response_no_token() {
        let response = GatewayError::NoToken.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = read_body_json(response.into_body()).await;
        assert_eq!(body["error"]["code"], "NO_TOKEN");
    }

    #[tokio::test]
    async fn test_into_response_cache_unavailable_hides_reason() {
        let response =
            GatewayError::CacheUnavailable("redis at 10.0.0.5 refused".to_string()).into_response();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert!(!response.headers().contains_key("WWW-Authenticate"));

        let body = read_body_json(response.into_body()).await;
        assert_eq!(body["error"]["code"], "SERVICE_UNAVAILABLE");
        assert!(!body.to_string().contains("10.0.0.5"));
    }

    #[tokio::test]
    async fn test_into_response_internal_hides_reason() {
        let response = GatewayError::Internal("signing key exploded".to_string()).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = read_body_json(response.into_body()).await;
        assert!(!body.to_string().contains("exploded"));
    }
}
