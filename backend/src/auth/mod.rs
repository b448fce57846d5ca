//! Authentication mechanics: password hashing, signed tokens, and session
//! claims. Session issuance itself lives in the domain layer
//! ([`crate::domain::auth_service`]); this module is the crypto underneath.

pub mod password;
pub mod session;
pub mod token;

pub use session::{AuthUser, SessionClaims};
