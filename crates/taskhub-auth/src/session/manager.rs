//! Session lifecycle manager — login, logout, and token validation flows.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use taskhub_core::config::session::SessionConfig;
use taskhub_core::error::AppError;
use taskhub_database::repositories::{SessionRepository, UserRepository};
use taskhub_entity::session::Session;
use taskhub_entity::user::User;

use crate::jwt::{Claims, JwtEncoder};
use crate::password::PasswordHasher;

/// Result of a successful login.
#[derive(Debug, Clone, serde::Serialize)]
pub struct LoginResult {
    /// Signed access token.
    pub token: String,
    /// When the token expires.
    pub expires_at: DateTime<Utc>,
    /// Created session.
    pub session: Session,
    /// The authenticated user.
    pub user: User,
}

/// Manages the complete session lifecycle.
#[derive(Clone)]
pub struct SessionManager {
    /// JWT encoder for token generation.
    jwt_encoder: Arc<JwtEncoder>,
    /// Session persistence.
    session_repo: Arc<dyn SessionRepository>,
    /// User lookup for credential checks.
    user_repo: Arc<dyn UserRepository>,
    /// Password hasher.
    password_hasher: Arc<PasswordHasher>,
    /// Session configuration.
    session_config: SessionConfig,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("session_config", &self.session_config)
            .finish()
    }
}

impl SessionManager {
    /// Creates a new session manager with all required dependencies.
    pub fn new(
        jwt_encoder: Arc<JwtEncoder>,
        session_repo: Arc<dyn SessionRepository>,
        user_repo: Arc<dyn UserRepository>,
        password_hasher: Arc<PasswordHasher>,
        session_config: SessionConfig,
    ) -> Self {
        Self {
            jwt_encoder,
            session_repo,
            user_repo,
            password_hasher,
            session_config,
        }
    }

    /// Performs the login flow: verify credentials, create a session row,
    /// and issue a token carrying the session id.
    ///
    /// Credential failures are indistinguishable to the caller; an unknown
    /// email and a wrong password both produce the same error.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResult, AppError> {
        let Some(user) = self.user_repo.find_by_email(email).await? else {
            return Err(AppError::unauthenticated("Invalid email or password"));
        };

        let password_valid = self
            .password_hasher
            .verify_password(password, &user.password_hash)?;

        if !password_valid {
            warn!(user_id = %user.id, "Login attempt with wrong password");
            return Err(AppError::unauthenticated("Invalid email or password"));
        }

        let expires_at =
            Utc::now() + chrono::Duration::hours(self.session_config.ttl_hours as i64);
        let session = self.session_repo.create(user.id, expires_at).await?;

        let (token, token_expires_at) =
            self.jwt_encoder
                .generate_token(user.id, session.id, &user.username, &user.email)?;

        info!(user_id = %user.id, session_id = %session.id, "User logged in");

        Ok(LoginResult {
            token,
            expires_at: token_expires_at,
            session,
            user,
        })
    }

    /// Terminates a session. Logging out an already-terminated session is
    /// not an error.
    pub async fn logout(&self, session_id: Uuid) -> Result<(), AppError> {
        let terminated = self.session_repo.terminate(session_id).await?;
        if terminated {
            info!(session_id = %session_id, "User logged out");
        }
        Ok(())
    }

    /// Validates decoded token claims against the stored session.
    ///
    /// A token whose session was terminated or has expired is rejected
    /// even if the token signature itself is still valid.
    pub async fn validate(&self, claims: &Claims) -> Result<Session, AppError> {
        let session = self
            .session_repo
            .find_by_id(claims.session_id())
            .await?
            .ok_or_else(|| AppError::unauthenticated("Session not found"))?;

        if !session.is_active() {
            return Err(AppError::unauthenticated("Session is no longer active"));
        }

        if session.user_id != claims.user_id() {
            return Err(AppError::unauthenticated("Session does not match token"));
        }

        Ok(session)
    }
}
