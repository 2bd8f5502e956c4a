//! Password hashing for the user store.
//!
//! Passwords are stored as Argon2id PHC strings with a random salt; the
//! plaintext never reaches the database.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

use crate::error::{Error, Result};

/// Hash a password into a self-describing PHC string.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| Error::PasswordHash(e.to_string()))?;
    Ok(hash.to_string())
}

/// Check a password against a stored PHC string.
///
/// An empty or malformed stored hash never verifies.
#[must_use]
pub fn verify_password(password: &str, stored: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("biryani42").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(!hash.contains("biryani42"));
        assert!(verify_password("biryani42", &hash));
        assert!(!verify_password("biryani43", &hash));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("same").unwrap();
        let b = hash_password("same").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_empty_or_garbage_hash_never_verifies() {
        assert!(!verify_password("", ""));
        assert!(!verify_password("anything", "plaintext"));
    }
}
