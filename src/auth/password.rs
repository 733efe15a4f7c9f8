//! Password hashing
//!
//! Stored hashes are bcrypt strings (`$2b$<cost>$...`). The cost factor is
//! part of the stored string, so hashes made under an older cost still verify.

use crate::error::{CatalogError, Result};

/// Hashes `password` with a fresh salt at the given bcrypt cost (4 to 31).
pub fn hash_password(password: &str, cost: u32) -> Result<String> {
    bcrypt::hash(password, cost)
        .map_err(|e| CatalogError::Internal(format!("password hashing failed: {}", e)))
}

/// Checks `password` against a stored hash. A malformed hash is an internal
/// error, not a mismatch.
pub fn verify_password(password: &str, stored: &str) -> Result<bool> {
    bcrypt::verify(password, stored)
        .map_err(|e| CatalogError::Internal(format!("malformed password hash: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_COST: u32 = 4;

    #[test]
    fn test_hash_then_verify() {
        let hash = hash_password("correct horse", TEST_COST).unwrap();
        assert!(hash.starts_with("$2b$04$"));
        assert!(verify_password("correct horse", &hash).unwrap());
        assert!(!verify_password("wrong horse", &hash).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        assert_ne!(
            hash_password("same", TEST_COST).unwrap(),
            hash_password("same", TEST_COST).unwrap()
        );
    }

    #[test]
    fn test_cost_travels_with_the_hash() {
        let hash = hash_password("password123", 5).unwrap();
        assert!(hash.starts_with("$2b$05$"));
        assert!(verify_password("password123", &hash).unwrap());
    }

    #[test]
    fn test_out_of_range_cost_is_an_error() {
        assert!(matches!(
            hash_password("x", 3),
            Err(CatalogError::Internal(_))
        ));
    }

    #[test]
    fn test_malformed_hash_is_an_error() {
        assert!(verify_password("x", "plaintext").is_err());
        assert!(verify_password("x", "$2b$04$short").is_err());
    }
}
