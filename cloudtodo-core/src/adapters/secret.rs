//! Account secret hashing (Argon2id, PHC string format)

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use rand::Rng;

use crate::domain::result::{Error, Result};
use crate::ports::identity::MIN_SECRET_LEN;

/// Reject secrets the provider would not accept
pub fn check_secret_strength(secret: &str) -> Result<()> {
    if secret.chars().count() < MIN_SECRET_LEN {
        return Err(Error::validation(format!(
            "Password must be at least {} characters",
            MIN_SECRET_LEN
        )));
    }
    Ok(())
}

/// Hash a secret into a self-describing PHC string
pub fn hash_secret(secret: &str) -> Result<String> {
    let salt_bytes: [u8; 16] = rand::thread_rng().gen();
    let salt = SaltString::encode_b64(&salt_bytes)
        .map_err(|e| Error::storage(format!("Failed to encode salt: {}", e)))?;

    let hash = Argon2::default()
        .hash_password(secret.as_bytes(), &salt)
        .map_err(|e| Error::storage(format!("Failed to hash secret: {}", e)))?;

    Ok(hash.to_string())
}

/// Verify a secret against a stored PHC string
pub fn verify_secret_hash(secret: &str, stored: &str) -> Result<bool> {
    let parsed = PasswordHash::new(stored)
        .map_err(|e| Error::storage(format!("Stored secret hash is malformed: {}", e)))?;

    Ok(Argon2::default()
        .verify_password(secret.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_secret("hunter22").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_secret_hash("hunter22", &hash).unwrap());
        assert!(!verify_secret_hash("hunter23", &hash).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_secret("same-secret").unwrap();
        let b = hash_secret("same-secret").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_secret_strength() {
        assert!(check_secret_strength("abcdef").is_ok());
        assert!(matches!(
            check_secret_strength("abc"),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_malformed_hash_is_storage_error() {
        assert!(matches!(
            verify_secret_hash("anything", "not-a-phc-string"),
            Err(Error::Storage(_))
        ));
    }
}
