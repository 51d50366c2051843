//! Credential hashing and session tokens.

mod password;
mod token;

pub use password::{hash_password, verify_password, DEFAULT_COST, MAX_COST, MIN_COST};
pub use token::{generate_session_token, hash_token, SessionToken};
