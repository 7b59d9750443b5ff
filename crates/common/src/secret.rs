//! Secret types for protecting sensitive values from accidental logging.
//!
//! Re-exports the [`secrecy`] types used for the token signing secret and any
//! other key material. `SecretString` implements `Debug` with redaction, so a
//! config struct that derives `Debug` cannot leak the secret through `{:?}` or
//! tracing fields. Secrets are zeroized on drop.
//!
//! # Example
//!
//! ```rust
//! use common::secret::{ExposeSecret, SecretString};
//!
//! let signing_secret = SecretString::from("0123456789abcdef0123456789abcdef");
//!
//! // Debug output is redacted
//! assert!(!format!("{signing_secret:?}").contains("0123"));
//!
//! // Access requires an explicit call
//! let raw: &str = signing_secret.expose_secret();
//! assert_eq!(raw.len(), 32);
//! ```

pub use secrecy::{ExposeSecret, SecretString};
