//! Session Gateway Library
//!
//! Guards HTTP endpoints with a signed session token carried in a cookie and
//! decides, per request, whether to grant access, silently renew the token,
//! or reject the request.
//!
//! # Architecture
//!
//! ```text
//! middleware/session.rs -> gateway.rs -> auth/codec.rs
//!                                     -> cache/ (SessionCache trait, Redis)
//! ```
//!
//! The session cache is the single authority on which token is current for an
//! account. Signature and expiry alone cannot revoke a token; overwriting or
//! deleting the cache entry can.
//!
//! # Modules
//!
//! - `auth` - Claims, token codec, device fingerprint
//! - `cache` - Session cache seam and Redis implementation
//! - `clock` - Injectable time source
//! - `config` - Gateway configuration from environment
//! - `cookies` - Session cookie construction and extraction
//! - `errors` - Rejection taxonomy with HTTP status mapping
//! - `gateway` - The per-request decision procedure
//! - `middleware` - Axum middleware wiring the gateway into a router
//! - `observability` - Metrics

pub mod auth;
pub mod cache;
pub mod clock;
pub mod config;
pub mod cookies;
pub mod errors;
pub mod gateway;
pub mod middleware;
pub mod observability;

pub use auth::{Claims, SessionIdentity, TokenCodec, TokenError};
pub use cache::{CacheError, RedisSessionCache, SessionCache};
pub use clock::{Clock, SystemClock};
pub use config::{ConfigError, GatewayConfig};
pub use errors::GatewayError;
pub use gateway::{AuthenticationGateway, Authorization, IssuedSession};
pub use middleware::{require_session, SessionAuthState, SessionContext, SessionContextExt};
