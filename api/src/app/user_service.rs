//! User service
//!
//! Looks users up by API key and provisions new users for the admin.

use std::sync::Arc;

use rand::Rng;
use sha2::{Digest, Sha256};

use crate::domain::entities::{NewUser, User};
use crate::domain::ports::UserRepository;
use crate::error::{AppError, DomainError};

/// Fields accepted when provisioning a user
#[derive(Debug, Clone, Default)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

/// Service for user lookup and provisioning
pub struct UserService<UR>
where
    UR: UserRepository + ?Sized,
{
    users: Arc<UR>,
}

impl<UR> UserService<UR>
where
    UR: UserRepository + ?Sized,
{
    pub fn new(users: Arc<UR>) -> Self {
        Self { users }
    }

    /// Resolve the user owning an API key
    pub async fn authenticate(&self, api_key: &str) -> Result<Option<User>, AppError> {
        Ok(self.users.find_by_api_key_hash(&hash_token(api_key)).await?)
    }

    /// Create a user. Returns (user, api_key); the key is only shown once.
    pub async fn create_user(&self, request: CreateUser) -> Result<(User, String), AppError> {
        let username = request.username.trim();
        if username.is_empty() || username.chars().count() > 150 {
            return Err(AppError::BadRequest(
                "Username must be between 1 and 150 characters".to_string(),
            ));
        }

        let email = request.email.trim();
        if !email.contains('@') {
            return Err(AppError::BadRequest(format!("Invalid email: {}", email)));
        }

        if self.users.find_by_username(username).await?.is_some() {
            return Err(AppError::Domain(DomainError::AlreadyExists(format!(
                "User with username '{}' already exists",
                username
            ))));
        }

        let api_key = generate_api_key();
        let new_user = NewUser {
            username: username.to_string(),
            email: email.to_string(),
            first_name: request.first_name.trim().to_string(),
            last_name: request.last_name.trim().to_string(),
            api_key_hash: hash_token(&api_key),
        };

        let user = self.users.create(&new_user).await?;
        tracing::info!(user_id = %user.id, username = %user.username, "Created user");

        Ok((user, api_key))
    }
}

/// Generate a random API key
fn generate_api_key() -> String {
    let mut rng = rand::thread_rng();
    let bytes: Vec<u8> = (0..32).map(|_| rng.gen()).collect();
    format!("sk-{}", hex::encode(bytes))
}

/// Hash a secret (API key or session token) for storage
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}
