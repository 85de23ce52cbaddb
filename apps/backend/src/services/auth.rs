//! Accounts, passwords and bearer tokens.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use wordswipe_core::types::{normalize_username, validate_password};
use wordswipe_core::User;

use crate::error::{ApiError, Result};
use crate::store::{NewAccount, SessionProvider};

/// Issue a new opaque bearer token.
pub fn generate_token() -> String {
    format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
}

/// Tokens are only stored as their SHA-256 hex digest.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Argon2id PHC string for a password, salted with 16 random bytes.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::encode_b64(Uuid::new_v4().as_bytes())
        .map_err(|e| ApiError::Internal(format!("Failed to create salt: {}", e)))?;
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| ApiError::Internal(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

/// Check a password against a stored PHC string. Unparseable hashes never match.
pub fn verify_password(password: &str, stored: &str) -> bool {
    PasswordHash::new(stored)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

/// Create an account and return it with its first token.
pub async fn register_account(
    auth: &dyn SessionProvider,
    username: &str,
    password: &str,
) -> Result<(User, String)> {
    let username = normalize_username(username)?;
    validate_password(password)?;

    // hashing is CPU bound
    let password = password.to_string();
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| ApiError::Internal(format!("Password hashing task failed: {}", e)))??;

    let (user, token) = auth
        .register(NewAccount {
            username,
            password_hash,
        })
        .await?;

    tracing::info!("Registered new user: {}", user.id);
    Ok((user, token))
}

/// Check credentials and issue a new token for the account.
pub async fn sign_in(
    auth: &dyn SessionProvider,
    username: &str,
    password: &str,
) -> Result<(User, String)> {
    let invalid = || ApiError::Unauthorized("Invalid username or password".to_string());

    let (user, stored) = auth
        .find_account(username.trim())
        .await?
        .ok_or_else(invalid)?;

    let password = password.to_string();
    let valid = tokio::task::spawn_blocking(move || verify_password(&password, &stored))
        .await
        .map_err(|e| ApiError::Internal(format!("Password check task failed: {}", e)))?;
    if !valid {
        tracing::warn!("Failed sign-in for user: {}", user.id);
        return Err(invalid());
    }

    let token = auth.issue_token(user.id).await?;
    tracing::info!("User signed in: {}", user.id);
    Ok((user, token))
}
