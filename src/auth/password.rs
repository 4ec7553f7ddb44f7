//! Password hashing utilities

use bcrypt::{hash, verify, DEFAULT_COST};

use crate::domain::{DomainError, DomainResult};

/// Minimum accepted password length
pub const MIN_PASSWORD_LEN: usize = 8;

/// Hash a password using bcrypt
pub fn hash_password(password: &str) -> DomainResult<String> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(DomainError::Validation(format!(
            "password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    hash(password, DEFAULT_COST)
        .map_err(|e| DomainError::Validation(format!("Password hashing failed: {}", e)))
}

/// Verify a password against a stored hash
pub fn verify_password(password: &str, stored_hash: &str) -> DomainResult<bool> {
    verify(password, stored_hash)
        .map_err(|e| DomainError::Validation(format!("Password verification failed: {}", e)))
}
