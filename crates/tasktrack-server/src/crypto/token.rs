//! Bearer session tokens.
//!
//! Tokens are 256 random bits, URL-safe base64 encoded. Only the SHA-256
//! hash of a token is ever stored.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use sha2::{Digest, Sha256};

use tasktrack_core::{UserId, UserRole};

/// A session as stored by the server.
#[derive(Debug, Clone)]
pub struct SessionToken {
    /// SHA-256 hash of the token (hex encoded).
    pub token_hash: String,

    pub user_id: UserId,

    /// Role at login time.
    pub role: UserRole,

    pub created_at: DateTime<Utc>,

    pub expires_at: DateTime<Utc>,
}

impl SessionToken {
    /// Create a session entry valid for `validity_hours` from now.
    pub fn new(token_hash: String, user_id: UserId, role: UserRole, validity_hours: u64) -> Self {
        let now = Utc::now();
        Self {
            token_hash,
            user_id,
            role,
            created_at: now,
            expires_at: now + Duration::hours(validity_hours as i64),
        }
    }

    /// Check if the session has not expired.
    pub fn is_valid(&self) -> bool {
        Utc::now() < self.expires_at
    }
}

/// Generate a new session token.
///
/// Returns `(plaintext_token, token_hash)`. The plaintext goes to the client,
/// the hash is kept by the server.
pub fn generate_session_token() -> (String, String) {
    let mut token_bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut token_bytes);

    let plaintext = URL_SAFE_NO_PAD.encode(token_bytes);
    let token_hash = hash_token(&plaintext);

    (plaintext, token_hash)
}

/// Hash a token using SHA-256.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}
