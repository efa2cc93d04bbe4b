//! User registration and profile operations.

use std::sync::Arc;

use tracing::info;

use taskhub_auth::password::{PasswordHasher, PasswordPolicy};
use taskhub_core::error::AppError;
use taskhub_database::repositories::UserRepository;
use taskhub_entity::user::{CreateUser, User};

use crate::context::RequestContext;

/// Handles user registration and profile lookups.
#[derive(Clone)]
pub struct UserService {
    /// User repository.
    user_repo: Arc<dyn UserRepository>,
    /// Password hasher.
    hasher: Arc<PasswordHasher>,
    /// Password policy.
    policy: Arc<PasswordPolicy>,
}

/// Data for registering a new account.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct RegisterUserRequest {
    /// Desired username.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Plaintext password.
    pub password: String,
}

impl UserService {
    /// Creates a new user service.
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        hasher: Arc<PasswordHasher>,
        policy: Arc<PasswordPolicy>,
    ) -> Self {
        Self {
            user_repo,
            hasher,
            policy,
        }
    }

    /// Registers a new user account.
    ///
    /// Validates the input, rejects duplicate emails before duplicate
    /// usernames, and stores only the Argon2 hash of the password.
    pub async fn register(&self, req: RegisterUserRequest) -> Result<User, AppError> {
        validate_username(&req.username)?;
        validate_email(&req.email)?;
        self.policy.validate(&req.password)?;

        if self.user_repo.find_by_email(&req.email).await?.is_some() {
            return Err(AppError::conflict("User with this email already exists"));
        }
        if self
            .user_repo
            .find_by_username(&req.username)
            .await?
            .is_some()
        {
            return Err(AppError::conflict("Username is already taken"));
        }

        let password_hash = self.hasher.hash_password(&req.password)?;
        let user = self
            .user_repo
            .create(&CreateUser {
                username: req.username,
                email: req.email,
                password_hash,
            })
            .await?;

        info!(user_id = %user.id, username = %user.username, "User registered");

        Ok(user)
    }

    /// Gets the current user's full profile.
    pub async fn get_profile(&self, ctx: &RequestContext) -> Result<User, AppError> {
        self.user_repo
            .find_by_id(ctx.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }
}

/// Username rules: 3-20 characters, starts with a letter, then letters,
/// digits, underscores, or hyphens.
fn validate_username(username: &str) -> Result<(), AppError> {
    if username.len() < 3 {
        return Err(AppError::validation(
            "Username must be at least 3 characters long",
        ));
    }
    if username.len() > 20 {
        return Err(AppError::validation(
            "Username must be at most 20 characters long",
        ));
    }
    let mut chars = username.chars();
    let first_ok = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
    if !first_ok || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') {
        return Err(AppError::validation(
            "Username must start with a letter and contain only letters, digits, underscores, and hyphens",
        ));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), AppError> {
    if !email.contains('@') || !email.contains('.') {
        return Err(AppError::validation("Invalid email format"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::InMemoryStore;
    use taskhub_core::config::auth::AuthConfig;
    use taskhub_core::error::ErrorKind;

    fn service(store: Arc<InMemoryStore>) -> UserService {
        UserService::new(
            store,
            Arc::new(PasswordHasher::new()),
            Arc::new(PasswordPolicy::new(&AuthConfig::default())),
        )
    }

    fn request(username: &str, email: &str, password: &str) -> RegisterUserRequest {
        RegisterUserRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn register_stores_hash_not_password() {
        let store = Arc::new(InMemoryStore::default());
        let user = service(store)
            .register(request("alice", "alice@example.com", "Password1"))
            .await
            .unwrap();

        assert_eq!(user.username, "alice");
        assert_ne!(user.password_hash, "Password1");
        assert!(user.password_hash.starts_with("$argon2"));
    }

    #[tokio::test]
    async fn register_reports_email_conflict_before_username_conflict() {
        let store = Arc::new(InMemoryStore::default());
        store.seed_user("alice", "alice@example.com");

        // Both the username and the email collide; the email wins.
        let err = service(store)
            .register(request("alice", "alice@example.com", "Password1"))
            .await
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::Conflict);
        assert_eq!(err.message, "User with this email already exists");
    }

    #[tokio::test]
    async fn register_rejects_duplicate_username() {
        let store = Arc::new(InMemoryStore::default());
        store.seed_user("alice", "alice@example.com");

        let err = service(store)
            .register(request("alice", "other@example.com", "Password1"))
            .await
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::Conflict);
        assert_eq!(err.message, "Username is already taken");
    }

    #[tokio::test]
    async fn register_rejects_bad_usernames() {
        let store = Arc::new(InMemoryStore::default());
        let svc = service(store);

        for username in ["ab", "1alice", "al ice", "a".repeat(21).as_str()] {
            let err = svc
                .register(request(username, "new@example.com", "Password1"))
                .await
                .unwrap_err();
            assert_eq!(err.kind, ErrorKind::Validation, "username: {username}");
        }
    }

    #[tokio::test]
    async fn register_enforces_password_policy() {
        let store = Arc::new(InMemoryStore::default());
        let err = service(store)
            .register(request("alice", "alice@example.com", "weak"))
            .await
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::Validation);
    }
}
