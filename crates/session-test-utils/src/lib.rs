//! # Session Test Utilities
//!
//! Shared test utilities for the session gateway.
//!
//! Everything here runs in-process; no Redis server or wall clock is needed.
//!
//! ## Modules
//!
//! - `mock_cache` - In-memory and always-failing [`SessionCache`] implementations
//! - `clock` - Manually driven clock
//! - `fixtures` - Test configuration, request builders, gateway harness
//!
//! ## Usage
//!
//! ```rust,ignore
//! use session_test_utils::*;
//!
//! #[tokio::test]
//! async fn test_example() {
//!     let harness = GatewayHarness::new();
//!     let issued = harness
//!         .gateway
//!         .establish_session("alice", Some(TEST_USER_AGENT), "Alice")
//!         .await
//!         .unwrap();
//!
//!     harness.clock.advance(60);
//!     let headers = request_headers(Some(&issued.token), Some(TEST_USER_AGENT));
//!     assert!(harness.gateway.authenticate(&headers).await.is_ok());
//! }
//! ```
//!
//! [`SessionCache`]: session_gateway::cache::SessionCache

pub mod clock;
pub mod fixtures;
pub mod mock_cache;

pub use clock::ManualClock;
pub use fixtures::*;
pub use mock_cache::{FailingSessionCache, InMemorySessionCache};
