//! HTTP middleware for the session gateway.
//!
//! # Components
//!
//! - `session` - Guards protected paths with the authentication gateway

pub mod session;

pub use session::{require_session, SessionAuthState, SessionContext, SessionContextExt};
