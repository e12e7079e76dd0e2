//! Password hashing and verification using Argon2id.
//!
//! Hashes carry their own random salt in PHC string format, so hashing the
//! same password twice never produces the same output. Verification is
//! constant-time with respect to the candidate password.

use argon2::{
    Argon2,
    password_hash::{
        self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};

/// Hash a password with Argon2id and a fresh random salt.
///
/// Returns the PHC string (algorithm, parameters, salt, and hash).
pub fn hash_password(password: &str) -> Result<String, password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a candidate password against a stored PHC hash.
///
/// A mismatch is `Ok(false)`, never an error; callers decide the
/// user-facing messaging. A malformed stored hash is an error.
pub fn verify_password(stored_hash: &str, candidate: &str) -> Result<bool, password_hash::Error> {
    let parsed = PasswordHash::new(stored_hash)?;
    match Argon2::default().verify_password(candidate.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_argon2id_phc_string() {
        let hash = hash_password("p1").unwrap();
        assert!(hash.starts_with("$argon2id$"));
    }

    #[test]
    fn test_same_password_hashes_differently() {
        let hash1 = hash_password("same-password").unwrap();
        let hash2 = hash_password("same-password").unwrap();
        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_verify_correct_password() {
        let hash = hash_password("correct horse").unwrap();
        assert!(verify_password(&hash, "correct horse").unwrap());
    }

    #[test]
    fn test_verify_wrong_password_is_false_not_error() {
        let hash = hash_password("correct horse").unwrap();
        assert!(!verify_password(&hash, "battery staple").unwrap());
    }

    #[test]
    fn test_malformed_stored_hash_is_error() {
        assert!(verify_password("not-a-phc-string", "anything").is_err());
    }
}
