//! Session token primitives.
//!
//! - `claims` - Claims carried inside a token and the timing predicates over them
//! - `codec` - HS256 minting and verification
//! - `fingerprint` - Device fingerprint derived from `User-Agent`

pub mod claims;
pub mod codec;
pub mod fingerprint;

pub use claims::{Claims, SessionIdentity};
pub use codec::{MintedToken, TokenCodec, TokenError};
pub use fingerprint::{derive_fingerprint, fingerprint_from_headers};
