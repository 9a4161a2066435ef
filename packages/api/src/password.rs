//! Argon2 password hashing.
//!
//! Hashing is CPU bound. Request handlers go through [`hash_password_blocking`] and
//! [`verify_password_blocking`], which run it on the blocking pool.

use std::sync::OnceLock;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};

pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("password must be at least {MIN_PASSWORD_LEN} characters")]
    TooShort,
    #[error("failed to gather salt: {0}")]
    Entropy(String),
    #[error("failed to hash password: {0}")]
    Hash(String),
    #[error("password task failed: {0}")]
    Task(String),
}

/// Compared against when the account does not exist, so lookups of unknown
/// names cost the same as real ones.
static DUMMY_HASH: OnceLock<Option<String>> = OnceLock::new();

fn dummy_hash() -> Option<&'static str> {
    DUMMY_HASH
        .get_or_init(|| hash_password("storefront-dummy-password").ok())
        .as_deref()
}

fn random_salt() -> Result<SaltString, PasswordError> {
    let mut bytes = [0u8; 16];
    getrandom::fill(&mut bytes).map_err(|e| PasswordError::Entropy(e.to_string()))?;
    SaltString::encode_b64(&bytes).map_err(|e| PasswordError::Entropy(e.to_string()))
}

/// Hashes `password` into a PHC string.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(PasswordError::TooShort);
    }
    let salt = random_salt()?;
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::Hash(e.to_string()))
}

/// A malformed stored hash verifies as `false`.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        tracing::warn!("Stored password hash is not a PHC string");
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

pub async fn hash_password_blocking(password: String) -> Result<String, PasswordError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| PasswordError::Task(e.to_string()))?
}

/// Verifies `password` against `stored_hash`, or against a dummy hash when there is
/// no account. A missing account never verifies.
pub async fn verify_password_blocking(password: String, stored_hash: Option<String>) -> bool {
    let result = tokio::task::spawn_blocking(move || match stored_hash {
        Some(hash) => verify_password(&password, &hash),
        None => {
            if let Some(dummy) = dummy_hash() {
                verify_password(&password, dummy);
            }
            false
        }
    })
    .await;

    match result {
        Ok(verified) => verified,
        Err(err) => {
            tracing::error!(error = %err, "Password verification task failed");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_verifies_and_hides_plaintext() {
        let hash = hash_password("correct horse").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(!hash.contains("correct horse"));
        assert!(verify_password("correct horse", &hash));
        assert!(!verify_password("wrong horse", &hash));
    }

    #[test]
    fn short_passwords_are_rejected() {
        assert!(matches!(hash_password("short"), Err(PasswordError::TooShort)));
    }

    #[test]
    fn garbage_hash_never_verifies() {
        assert!(!verify_password("anything", "plaintext"));
    }

    #[tokio::test]
    async fn blocking_helpers_hash_and_verify() {
        let hash = hash_password_blocking("correct horse".to_string())
            .await
            .unwrap();
        assert!(verify_password_blocking("correct horse".to_string(), Some(hash.clone())).await);
        assert!(!verify_password_blocking("wrong horse".to_string(), Some(hash)).await);
    }

    #[tokio::test]
    async fn missing_account_still_pays_for_a_hash() {
        assert!(!verify_password_blocking("storefront-dummy-password".to_string(), None).await);
        assert!(dummy_hash().is_some_and(|hash| hash.starts_with("$argon2")));
    }
}
