//! Password hashing with bcrypt.
//!
//! Stored values are standard `$2b$` strings carrying their own salt and cost.

use bcrypt::BcryptError;

/// Cost used when none is configured.
pub const DEFAULT_COST: u32 = bcrypt::DEFAULT_COST;

/// Cheapest cost bcrypt accepts.
pub const MIN_COST: u32 = 4;

/// Most expensive cost bcrypt accepts.
pub const MAX_COST: u32 = 31;

/// Hash a password with a fresh random salt at `cost`.
pub fn hash_password(password: &str, cost: u32) -> Result<String, BcryptError> {
    bcrypt::hash(password, cost)
}

/// Check `password` against a value produced by [`hash_password`].
/// Malformed stored values never verify.
pub fn verify_password(password: &str, stored: &str) -> bool {
    bcrypt::verify(password, stored).unwrap_or(false)
}
