//! Device fingerprint derivation.
//!
//! A session token is bound to the client that logged in by storing the
//! lower-cased `User-Agent` in its claims. Every request derives the same
//! value from its own headers and must match exactly.

use axum::http::{header::USER_AGENT, HeaderMap};

/// Derive the device fingerprint from a raw `User-Agent` value.
///
/// A missing header yields the empty fingerprint, which only matches a token
/// that was itself issued without a `User-Agent`.
pub fn derive_fingerprint(user_agent: Option<&str>) -> String {
    user_agent.map(str::to_lowercase).unwrap_or_default()
}

/// Derive the device fingerprint from request headers.
///
/// Header bytes that are not valid UTF-8 are replaced with U+FFFD rather than
/// dropped, so an opaque `User-Agent` never reads as a missing one.
pub fn fingerprint_from_headers(headers: &HeaderMap) -> String {
    match headers.get(USER_AGENT) {
        Some(value) => String::from_utf8_lossy(value.as_bytes()).to_lowercase(),
        None => derive_fingerprint(None),
    }
}
