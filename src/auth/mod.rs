//! Credentials and sessions: password rules and hashing, signed bearer and
//! reset tokens, and the request extractors that resolve the caller.

pub mod extract;
pub mod password;
pub mod token;

pub use extract::{AuthUser, OptionalAuthUser};
pub use token::{TokenKind, TokenSigner};
