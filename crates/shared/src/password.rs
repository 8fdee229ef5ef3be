//! Password digests using Argon2id.
//!
//! User records never hold a plaintext password. The stored value is a
//! PHC-formatted Argon2id string, which carries its own salt and parameters.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use thiserror::Error;

/// Error type for password operations.
#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("Failed to digest password: {0}")]
    Digest(String),

    #[error("Failed to verify password: {0}")]
    Verify(String),

    #[error("Invalid password digest format")]
    InvalidDigestFormat,
}

// OWASP 2024 recommendation: 19 MiB, 2 iterations, 1 lane.
const MEMORY_COST: u32 = 19456;
const TIME_COST: u32 = 2;
const PARALLELISM: u32 = 1;
const OUTPUT_LEN: usize = 32;

/// PHC prefix every digest produced by [`digest_password`] starts with.
pub const DIGEST_PREFIX: &str = "$argon2id$";

fn hasher() -> Result<Argon2<'static>, PasswordError> {
    let params = Params::new(MEMORY_COST, TIME_COST, PARALLELISM, Some(OUTPUT_LEN))
        .map_err(|e| PasswordError::Digest(format!("Failed to create Argon2 params: {}", e)))?;

    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Produces an irreversible digest of `password`.
///
/// # Example
/// ```
/// use shared::password::digest_password;
///
/// let digest = digest_password("hunter2").unwrap();
/// assert!(digest.starts_with("$argon2id$"));
/// ```
pub fn digest_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    hasher()?
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::Digest(e.to_string()))
}

/// Checks `password` against a stored digest.
///
/// Returns `Ok(false)` on mismatch and an error only when the digest itself
/// cannot be parsed.
pub fn verify_password(password: &str, digest: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(digest).map_err(|_| PasswordError::InvalidDigestFormat)?;

    // Parameters come from the digest itself.
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::Verify(e.to_string())),
    }
}

/// Whether `value` already looks like a digest produced by this module.
pub fn is_digest(value: &str) -> bool {
    value.starts_with(DIGEST_PREFIX) && PasswordHash::new(value).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_is_phc_argon2id() {
        let digest = digest_password("test_password").unwrap();
        assert!(digest.starts_with("$argon2id$v=19$m=19456,t=2,p=1$"));
    }

    #[test]
    fn test_digest_never_contains_plaintext() {
        let digest = digest_password("plaintext-secret").unwrap();
        assert!(!digest.contains("plaintext-secret"));
    }

    #[test]
    fn test_same_password_different_salts() {
        let first = digest_password("same_password").unwrap();
        let second = digest_password("same_password").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_verify_password_correct_and_incorrect() {
        let digest = digest_password("correct horse").unwrap();
        assert!(verify_password("correct horse", &digest).unwrap());
        assert!(!verify_password("battery staple", &digest).unwrap());
    }

    #[test]
    fn test_verify_password_invalid_digest() {
        let result = verify_password("password", "5f4dcc3b5aa765d61d8327deb882cf99");
        assert!(matches!(result, Err(PasswordError::InvalidDigestFormat)));
    }

    #[test]
    fn test_is_digest() {
        let digest = digest_password("pw").unwrap();
        assert!(is_digest(&digest));
        assert!(!is_digest("pw"));
        assert!(!is_digest("$argon2id$garbage"));
    }

    #[test]
    fn test_unicode_password() {
        let password = "mot de passe é ü 密码";
        let digest = digest_password(password).unwrap();
        assert!(verify_password(password, &digest).unwrap());
    }
}
