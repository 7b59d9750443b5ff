//! Session gateway configuration.
//!
//! Configuration is loaded from environment variables. The signing secret and
//! Redis URL are redacted in Debug output.

use common::jwt::{is_strong_hmac_secret, MIN_HMAC_SECRET_BYTES};
use common::secret::SecretString;
use std::collections::HashMap;
use std::env;
use std::fmt;
use thiserror::Error;

/// Default token lifetime in seconds (30 minutes).
pub const DEFAULT_TOKEN_TTL_SECONDS: i64 = 1800;

/// Default renewal window in seconds (10 minutes).
///
/// Previous deployments compared expiry against a 600 *millisecond* offset,
/// so renewal almost never fired. The unit here is seconds and the value is
/// explicit configuration; the intended magnitude is a product decision.
pub const DEFAULT_RENEWAL_WINDOW_SECONDS: i64 = 600;

/// Default cache key prefix for the authoritative token entry.
pub const DEFAULT_CACHE_KEY_PREFIX: &str = "session:access_token:";

/// Default path prefix guarded by the gateway.
pub const DEFAULT_PROTECTED_PATH_PREFIX: &str = "/specials/";

/// Default host the session cookies are scoped to.
pub const DEFAULT_COOKIE_DOMAIN: &str = "127.0.0.1";

/// Default name of the cookie carrying the bearer token.
pub const DEFAULT_TOKEN_COOKIE_NAME: &str = "access_token";

/// Default name of the cookie carrying the display name.
pub const DEFAULT_DISPLAY_NAME_COOKIE_NAME: &str = "user_name";

/// Default Redis URL.
pub const DEFAULT_REDIS_URL: &str = "redis://localhost:6379";

/// Session gateway configuration.
#[derive(Clone)]
pub struct GatewayConfig {
    /// HS256 signing secret shared by every gateway instance.
    pub signing_secret: SecretString,

    /// Lifetime of minted tokens, cookies and cache entries, in seconds.
    pub token_ttl_seconds: i64,

    /// Tokens expiring within this many seconds are silently renewed.
    pub renewal_window_seconds: i64,

    /// Prefix prepended to the account to form the cache key.
    pub cache_key_prefix: String,

    /// Only request paths starting with this prefix are authenticated.
    pub protected_path_prefix: String,

    /// Host both session cookies are scoped to.
    pub cookie_domain: String,

    /// Name of the bearer token cookie.
    pub token_cookie_name: String,

    /// Name of the display-name cookie.
    pub display_name_cookie_name: String,

    /// Redis connection URL for the session cache.
    pub redis_url: String,
}

/// Custom Debug implementation that redacts sensitive fields.
impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("signing_secret", &"[REDACTED]")
            .field("token_ttl_seconds", &self.token_ttl_seconds)
            .field("renewal_window_seconds", &self.renewal_window_seconds)
            .field("cache_key_prefix", &self.cache_key_prefix)
            .field("protected_path_prefix", &self.protected_path_prefix)
            .field("cookie_domain", &self.cookie_domain)
            .field("token_cookie_name", &self.token_cookie_name)
            .field("display_name_cookie_name", &self.display_name_cookie_name)
            .field("redis_url", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid signing secret: {0}")]
    InvalidSigningSecret(String),

    #[error("Invalid token TTL configuration: {0}")]
    InvalidTokenTtl(String),

    #[error("Invalid renewal window configuration: {0}")]
    InvalidRenewalWindow(String),

    #[error("Invalid value for {0}: must not be empty")]
    EmptyValue(String),
}

impl GatewayConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing).
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let signing_secret = vars
            .get("SESSION_SIGNING_SECRET")
            .ok_or_else(|| ConfigError::MissingEnvVar("SESSION_SIGNING_SECRET".to_string()))?;
        if !is_strong_hmac_secret(signing_secret.as_bytes()) {
            return Err(ConfigError::InvalidSigningSecret(format!(
                "SESSION_SIGNING_SECRET must be at least {MIN_HMAC_SECRET_BYTES} bytes"
            )));
        }
        let signing_secret = SecretString::from(signing_secret.as_str());

        let token_ttl_seconds = match vars.get("SESSION_TOKEN_TTL_SECONDS") {
            Some(value_str) => {
                let value: i64 = value_str.parse().map_err(|e| {
                    ConfigError::InvalidTokenTtl(format!(
                        "SESSION_TOKEN_TTL_SECONDS must be a valid integer, got '{value_str}': {e}"
                    ))
                })?;
                if value <= 0 {
                    return Err(ConfigError::InvalidTokenTtl(format!(
                        "SESSION_TOKEN_TTL_SECONDS must be positive, got {value}"
                    )));
                }
                value
            }
            None => DEFAULT_TOKEN_TTL_SECONDS,
        };

        let renewal_window_seconds = match vars.get("SESSION_RENEWAL_WINDOW_SECONDS") {
            Some(value_str) => value_str.parse().map_err(|e| {
                ConfigError::InvalidRenewalWindow(format!(
                    "SESSION_RENEWAL_WINDOW_SECONDS must be a valid integer, got '{value_str}': {e}"
                ))
            })?,
            None => DEFAULT_RENEWAL_WINDOW_SECONDS,
        };
        if renewal_window_seconds < 0 {
            return Err(ConfigError::InvalidRenewalWindow(format!(
                "SESSION_RENEWAL_WINDOW_SECONDS must not be negative, got {renewal_window_seconds}"
            )));
        }
        // A window as long as the ttl would reissue on every request.
        if renewal_window_seconds >= token_ttl_seconds {
            return Err(ConfigError::InvalidRenewalWindow(format!(
                "SESSION_RENEWAL_WINDOW_SECONDS ({renewal_window_seconds}) must be less than \
                 SESSION_TOKEN_TTL_SECONDS ({token_ttl_seconds})"
            )));
        }

        let cache_key_prefix =
            non_empty_or_default(vars, "SESSION_CACHE_KEY_PREFIX", DEFAULT_CACHE_KEY_PREFIX)?;
        let protected_path_prefix = non_empty_or_default(
            vars,
            "SESSION_PROTECTED_PATH_PREFIX",
            DEFAULT_PROTECTED_PATH_PREFIX,
        )?;
        let cookie_domain =
            non_empty_or_default(vars, "SESSION_COOKIE_DOMAIN", DEFAULT_COOKIE_DOMAIN)?;
        let token_cookie_name =
            non_empty_or_default(vars, "SESSION_TOKEN_COOKIE_NAME", DEFAULT_TOKEN_COOKIE_NAME)?;
        let display_name_cookie_name = non_empty_or_default(
            vars,
            "SESSION_DISPLAY_NAME_COOKIE_NAME",
            DEFAULT_DISPLAY_NAME_COOKIE_NAME,
        )?;

        let redis_url = vars
            .get("REDIS_URL")
            .cloned()
            .unwrap_or_else(|| DEFAULT_REDIS_URL.to_string());

        Ok(GatewayConfig {
            signing_secret,
            token_ttl_seconds,
            renewal_window_seconds,
            cache_key_prefix,
            protected_path_prefix,
            cookie_domain,
            token_cookie_name,
            display_name_cookie_name,
            redis_url,
        })
    }

    /// Cache key holding the authoritative token for `account`.
    pub fn cache_key(&self, account: &str) -> String {
        format!("{}{}", self.cache_key_prefix, account)
    }

    /// Token lifetime as a cache TTL.
    pub fn cache_ttl_seconds(&self) -> u64 {
        u64::try_from(self.token_ttl_seconds).unwrap_or(0)
    }

    /// Whether requests to `path` must carry a session.
    pub fn is_protected_path(&self, path: &str) -> bool {
        path.starts_with(&self.protected_path_prefix)
    }
}

fn non_empty_or_default(
    vars: &HashMap<String, String>,
    name: &str,
    default: &str,
) -> Result<String, ConfigError> {
    match vars.get(name) {
        Some(value) if value.is_empty() => Err(ConfigError::EmptyValue(name.to_string())),
        Some(value) => Ok(value.clone()),
        None => Ok(default.to_string()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use common::secret::ExposeSecret;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn base_vars() -> HashMap<String, String> {
        HashMap::from([("SESSION_SIGNING_SECRET".to_string(), SECRET.to_string())])
    }

    #[test]
    fn test_from_vars_with_defaults() {
        let config = GatewayConfig::from_vars(&base_vars()).expect("config should load");

        assert_eq!(config.signing_secret.expose_secret(), SECRET);
        assert_eq!(config.token_ttl_seconds, DEFAULT_TOKEN_TTL_SECONDS);
        assert_eq!(config.renewal_window_seconds, DEFAULT_RENEWAL_WINDOW_SECONDS);
        assert_eq!(config.cache_key_prefix, DEFAULT_CACHE_KEY_PREFIX);
        assert_eq!(config.protected_path_prefix, DEFAULT_PROTECTED_PATH_PREFIX);
        assert_eq!(config.cookie_domain, DEFAULT_COOKIE_DOMAIN);
        assert_eq!(config.token_cookie_name, DEFAULT_TOKEN_COOKIE_NAME);
        assert_eq!(config.display_name_cookie_name, DEFAULT_DISPLAY_NAME_COOKIE_NAME);
        assert_eq!(config.redis_url, DEFAULT_REDIS_URL);
    }

    #[test]
    fn test_from_vars_with_custom_values() {
        let mut vars = base_vars();
        vars.insert("SESSION_TOKEN_TTL_SECONDS".to_string(), "3600".to_string());
        vars.insert("SESSION_RENEWAL_WINDOW_SECONDS".to_string(), "300".to_string());
        vars.insert("SESSION_CACHE_KEY_PREFIX".to_string(), "tok:".to_string());
        vars.insert("SESSION_PROTECTED_PATH_PREFIX".to_string(), "/api/".to_string());
        vars.insert("SESSION_COOKIE_DOMAIN".to_string(), "example.com".to_string());
        vars.insert("SESSION_TOKEN_COOKIE_NAME".to_string(), "sid".to_string());
        vars.insert("SESSION_DISPLAY_NAME_COOKIE_NAME".to_string(), "who".to_string());
        vars.insert("REDIS_URL".to_string(), "redis://cache:6379".to_string());

        let config = GatewayConfig::from_vars(&vars).expect("config should load");

        assert_eq!(config.token_ttl_seconds, 3600);
        assert_eq!(config.renewal_window_seconds, 300);
        assert_eq!(config.cache_key("alice"), "tok:alice");
        assert!(config.is_protected_path("/api/orders"));
        assert!(!config.is_protected_path("/health"));
        assert_eq!(config.cookie_domain, "example.com");
        assert_eq!(config.token_cookie_name, "sid");
        assert_eq!(config.display_name_cookie_name, "who");
        assert_eq!(config.redis_url, "redis://cache:6379");
        assert_eq!(config.cache_ttl_seconds(), 3600);
    }

    #[test]
    fn test_missing_secret() {
        let result = GatewayConfig::from_vars(&HashMap::new());
        assert!(
            matches!(result, Err(ConfigError::MissingEnvVar(ref name)) if name == "SESSION_SIGNING_SECRET")
        );
    }

    #[test]
    fn test_short_secret_rejected() {
        let vars = HashMap::from([(
            "SESSION_SIGNING_SECRET".to_string(),
            "too-short".to_string(),
        )]);
        let result = GatewayConfig::from_vars(&vars);
        assert!(matches!(result, Err(ConfigError::InvalidSigningSecret(_))));
    }

    #[test]
    fn test_ttl_must_be_positive_integer() {
        for bad in ["0", "-10", "abc", "1.5"] {
            let mut vars = base_vars();
            vars.insert("SESSION_TOKEN_TTL_SECONDS".to_string(), bad.to_string());
            let result = GatewayConfig::from_vars(&vars);
            assert!(
                matches!(result, Err(ConfigError::InvalidTokenTtl(_))),
                "ttl '{bad}' should be rejected"
            );
        }
    }

    #[test]
    fn test_negative_renewal_window_rejected() {
        let mut vars = base_vars();
        vars.insert("SESSION_RENEWAL_WINDOW_SECONDS".to_string(), "-1".to_string());
        let result = GatewayConfig::from_vars(&vars);
        assert!(matches!(result, Err(ConfigError::InvalidRenewalWindow(_))));
    }

    #[test]
    fn test_renewal_window_must_be_shorter_than_ttl() {
        let mut vars = base_vars();
        vars.insert("SESSION_TOKEN_TTL_SECONDS".to_string(), "600".to_string());
        vars.insert("SESSION_RENEWAL_WINDOW_SECONDS".to_string(), "600".to_string());
        let result = GatewayConfig::from_vars(&vars);
        assert!(matches!(result, Err(ConfigError::InvalidRenewalWindow(_))));
    }

    #[test]
    fn test_zero_renewal_window_disables_renewal() {
        let mut vars = base_vars();
        vars.insert("SESSION_RENEWAL_WINDOW_SECONDS".to_string(), "0".to_string());
        let config = GatewayConfig::from_vars(&vars).expect("config should load");
        assert_eq!(config.renewal_window_seconds, 0);
    }

    #[test]
    fn test_protected_path_is_prefix_match() {
        let config = GatewayConfig::from_vars(&base_vars()).expect("config should load");

        assert!(config.is_protected_path("/specials/"));
        assert!(config.is_protected_path("/specials/offers/42"));
        assert!(!config.is_protected_path("/public/specials/offers"));
        assert!(!config.is_protected_path("/specials"));
    }

    #[test]
    fn test_empty_cookie_name_rejected() {
        let mut vars = base_vars();
        vars.insert("SESSION_TOKEN_COOKIE_NAME".to_string(), String::new());
        let result = GatewayConfig::from_vars(&vars);
        assert!(
            matches!(result, Err(ConfigError::EmptyValue(ref name)) if name == "SESSION_TOKEN_COOKIE_NAME")
        );
    }

    #[test]
    fn test_debug_redacts_sensitive_fields() {
        let mut vars = base_vars();
        vars.insert(
            "REDIS_URL".to_string(),
            "redis://:hunter2@cache:6379".to_string(),
        );
        let config = GatewayConfig::from_vars(&vars).expect("config should load");

        let debug_str = format!("{config:?}");
        assert!(!debug_str.contains(SECRET));
        assert!(!debug_str.contains("hunter2"));
        assert!(debug_str.contains("[REDACTED]"));
        assert!(debug_str.contains("token_ttl_seconds"));
    }
}
