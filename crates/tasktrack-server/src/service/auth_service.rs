//! Registration, login and bearer-token sessions.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use tasktrack_core::{validate, User, UserId, UserRole};

use super::ServiceError;
use crate::crypto::{generate_session_token, hash_password, hash_token, verify_password, SessionToken};
use crate::store::{StoreError, UserStore};

/// The authenticated caller of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: UserId,
    pub role: UserRole,
}

impl Session {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    /// Plaintext bearer token. Only ever returned here.
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: User,
}

/// Issues and checks bearer tokens.
pub struct AuthService {
    users: Arc<dyn UserStore>,
    /// Sessions indexed by token hash.
    sessions: RwLock<HashMap<String, SessionToken>>,
    token_expiry_hours: u64,
    /// bcrypt cost for new password hashes.
    password_cost: u32,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, token_expiry_hours: u64, password_cost: u32) -> Self {
        Self {
            users,
            sessions: RwLock::new(HashMap::new()),
            token_expiry_hours,
            password_cost,
        }
    }

    /// Register a user. `role` is whatever the client asked for; only an
    /// explicit `"admin"` grants admin rights.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        role: Option<&str>,
    ) -> Result<User, ServiceError> {
        let email = email.trim();
        validate::email(email)?;
        validate::password(password)?;

        let password_hash = self.hash(password).await?;
        let user = User::new(email, password_hash, UserRole::from_requested(role));
        if let Err(e) = self.users.create(user.clone()).await {
            if matches!(e, StoreError::Conflict(_)) {
                warn!(email = %email, "Registration with existing email");
            }
            return Err(e.into());
        }

        info!(user_id = %user.id, role = ?user.role, "User registered");
        Ok(user)
    }

    /// Exchange credentials for a bearer token. Unknown email and wrong
    /// password produce the same error.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, ServiceError> {
        let invalid = || ServiceError::Unauthorized("invalid email or password".to_string());

        let user = self.users.find_by_email(email.trim()).await?.ok_or_else(invalid)?;
        if !self.verify(password, &user.password_hash).await? {
            debug!(user_id = %user.id, "Password mismatch");
            return Err(invalid());
        }

        let (token, token_hash) = generate_session_token();
        let session = SessionToken::new(
            token_hash.clone(),
            user.id.clone(),
            user.role,
            self.token_expiry_hours,
        );
        let expires_at = session.expires_at;

        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, s| s.is_valid());
        sessions.insert(token_hash, session);
        drop(sessions);

        info!(user_id = %user.id, expires_at = %expires_at, "User logged in");
        Ok(LoginOutcome {
            token,
            expires_at,
            user,
        })
    }

    /// Resolve a bearer token to its session.
    pub async fn authenticate(&self, token: &str) -> Result<Session, ServiceError> {
        let token_hash = hash_token(token);

        let found = self.sessions.read().await.get(&token_hash).cloned();
        match found {
            Some(session) if session.is_valid() => Ok(Session {
                user_id: session.user_id,
                role: session.role,
            }),
            Some(_) => {
                self.sessions.write().await.remove(&token_hash);
                Err(ServiceError::Unauthorized("token expired".to_string()))
            }
            None => Err(ServiceError::Unauthorized("invalid token".to_string())),
        }
    }

    /// bcrypt is CPU bound, keep it off the runtime threads.
    async fn hash(&self, password: &str) -> Result<String, ServiceError> {
        let password = password.to_string();
        let cost = self.password_cost;
        tokio::task::spawn_blocking(move || hash_password(&password, cost))
            .await
            .map_err(|e| ServiceError::Internal(format!("password hashing task failed: {e}")))?
            .map_err(|e| ServiceError::Internal(format!("password hashing failed: {e}")))
    }

    async fn verify(&self, password: &str, stored: &str) -> Result<bool, ServiceError> {
        let (password, stored) = (password.to_string(), stored.to_string());
        tokio::task::spawn_blocking(move || verify_password(&password, &stored))
            .await
            .map_err(|e| ServiceError::Internal(format!("password check task failed: {e}")))
    }

    /// Number of live sessions.
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}
