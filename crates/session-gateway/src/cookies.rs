//! Session cookie contract.
//!
//! Two cookies travel with a session, both scoped to the configured host with
//! `Max-Age` equal to the token lifetime:
//!
//! - token cookie - the bearer token, `HttpOnly`
//! - display-name cookie - readable by page scripts, not `HttpOnly`

use crate::config::GatewayConfig;
use axum::http::{header::COOKIE, HeaderMap, HeaderValue};
use cookie::Cookie;

/// The pair of cookies emitted whenever a token is issued.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionCookies {
    pub token: Cookie<'static>,
    pub display_name: Cookie<'static>,
}

impl SessionCookies {
    /// Build both cookies for a freshly issued token.
    pub fn new(config: &GatewayConfig, token: &str, display_name: &str) -> Self {
        let max_age = time::Duration::seconds(config.token_ttl_seconds);

        let token = Cookie::build((config.token_cookie_name.clone(), token.to_string()))
            .domain(config.cookie_domain.clone())
            .path("/")
            .max_age(max_age)
            .http_only(true)
            .build();

        let display_name =
            Cookie::build((config.display_name_cookie_name.clone(), display_name.to_string()))
                .domain(config.cookie_domain.clone())
                .path("/")
                .max_age(max_age)
                .build();

        Self {
            token,
            display_name,
        }
    }

    /// Render both cookies as `Set-Cookie` header values, token cookie first.
    ///
    /// Values are percent-encoded so arbitrary display names stay header-safe.
    ///
    /// # Errors
    ///
    /// Returns the header conversion error if a rendered cookie is not a valid header value.
    pub fn to_header_values(&self) -> Result<Vec<HeaderValue>, axum::http::header::InvalidHeaderValue> {
        [&self.token, &self.display_name]
            .into_iter()
            .map(|c| HeaderValue::from_str(&c.encoded().to_string()))
            .collect()
    }
}

/// Read the value of cookie `name` from the request's `Cookie` headers.
///
/// An empty value counts as absent. The first non-empty match wins.
pub fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|c| c.name() == name && !c.value().is_empty())
        .map(|c| c.value().to_string())
}
