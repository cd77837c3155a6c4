//! Password hashing and verification
//!
//! Passwords are stored as Argon2id PHC strings.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use weview_core::DomainError;

use crate::error::AppError;

/// Hash a password using Argon2id
///
/// # Errors
/// Returns an error if hashing fails
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {e}")))
}

/// Verify a password against a hash
///
/// # Errors
/// Returns an error if the stored hash is malformed
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid password hash format: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Password verifier handed to the session service
#[derive(Debug, Clone, Default)]
pub struct PasswordService;

impl PasswordService {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Hash a password
    ///
    /// # Errors
    /// Returns `DomainError::InternalError` if hashing fails
    pub fn hash(&self, password: &str) -> Result<String, DomainError> {
        hash_password(password).map_err(|e| DomainError::InternalError(e.to_string()))
    }

    /// Verify a password and return `InvalidPassword` on mismatch
    ///
    /// # Errors
    /// Returns `DomainError::InvalidPassword` if the password doesn't match,
    /// `DomainError::InternalError` if the stored hash is malformed
    pub fn verify_or_error(&self, password: &str, hash: &str) -> Result<(), DomainError> {
        match verify_password(password, hash) {
            Ok(true) => Ok(()),
            Ok(false) => Err(DomainError::InvalidPassword),
            Err(e) => Err(DomainError::InternalError(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password() {
        let password = "popcorn-night";
        let hash = hash_password(password).unwrap();

        assert!(hash.starts_with("$argon2"));
        // different salt each time
        let hash2 = hash_password(password).unwrap();
        assert_ne!(hash, hash2);
    }

    #[test]
    fn test_verify_password() {
        let hash = hash_password("popcorn-night").unwrap();

        assert!(verify_password("popcorn-night", &hash).unwrap());
        assert!(!verify_password("wrong", &hash).unwrap());
    }

    #[test]
    fn test_verify_malformed_hash() {
        assert!(verify_password("anything", "not-a-phc-string").is_err());
    }

    #[test]
    fn test_verify_or_error() {
        let service = PasswordService::new();
        let hash = service.hash("popcorn-night").unwrap();

        assert!(service.verify_or_error("popcorn-night", &hash).is_ok());
        assert!(matches!(
            service.verify_or_error("wrong", &hash),
            Err(DomainError::InvalidPassword)
        ));
    }
}
