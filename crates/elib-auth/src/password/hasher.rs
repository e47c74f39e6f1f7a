//! Password digests for storage and login comparison.
//!
//! The default scheme is an unsalted SHA-256 digest encoded as lowercase hex,
//! compared by exact string equality. Argon2id can be selected for new
//! hashes; stored Argon2 PHC strings are always verified with Argon2.

use argon2::{
    Argon2,
    password_hash::{
        PasswordHash, PasswordHasher as ArgonHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};
use sha2::{Digest, Sha256};

use elib_core::config::auth::PasswordScheme;
use elib_core::error::AppError;

/// Prefix of every Argon2 PHC string.
const ARGON2_PREFIX: &str = "$argon2";

/// Unsalted SHA-256 digest of `plaintext`, lowercase hex.
pub fn sha256_hex(plaintext: &str) -> String {
    hex::encode(Sha256::digest(plaintext.as_bytes()))
}

/// Hashes and verifies passwords using the configured scheme.
#[derive(Debug, Clone, Default)]
pub struct PasswordHasher {
    /// Scheme for newly produced hashes.
    scheme: PasswordScheme,
}

impl PasswordHasher {
    /// Creates a new password hasher for the given scheme.
    pub fn new(scheme: PasswordScheme) -> Self {
        Self { scheme }
    }

    /// Returns the scheme used for new hashes.
    pub fn scheme(&self) -> PasswordScheme {
        self.scheme
    }

    /// Hashes a plaintext password for storage.
    pub fn hash_password(&self, password: &str) -> Result<String, AppError> {
        match self.scheme {
            PasswordScheme::Sha256 => Ok(sha256_hex(password)),
            PasswordScheme::Argon2id => {
                let salt = SaltString::generate(&mut OsRng);
                let hash = Argon2::default()
                    .hash_password(password.as_bytes(), &salt)
                    .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?;
                Ok(hash.to_string())
            }
        }
    }

    /// Verifies a plaintext password against a stored digest.
    ///
    /// Returns `Ok(true)` if the password matches, `Ok(false)` if not.
    pub fn verify_password(&self, password: &str, stored: &str) -> Result<bool, AppError> {
        if !stored.starts_with(ARGON2_PREFIX) {
            return Ok(sha256_hex(password) == stored);
        }

        let parsed_hash = PasswordHash::new(stored)
            .map_err(|e| AppError::internal(format!("Invalid password hash format: {e}")))?;

        match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AppError::internal(format!(
                "Password verification failed: {e}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_digest_is_deterministic_hex() {
        // sha256("pw")
        let digest = sha256_hex("pw");
        assert_eq!(
            digest,
            "30c952fab122c3f9759f02a6d95c3758b246b4fee239957b2d4fee46e26170c4"
        );
        assert_eq!(digest, sha256_hex("pw"));
        assert_eq!(digest.len(), 64);
    }

    #[test]
    fn sha256_scheme_verifies_by_exact_comparison() {
        let hasher = PasswordHasher::default();
        let stored = hasher.hash_password("secret").unwrap();
        assert!(hasher.verify_password("secret", &stored).unwrap());
        assert!(!hasher.verify_password("Secret", &stored).unwrap());
        assert!(
            !hasher
                .verify_password("secret", &stored.to_uppercase())
                .unwrap()
        );
    }

    #[test]
    fn argon2_hashes_are_verified_regardless_of_scheme() {
        let argon = PasswordHasher::new(PasswordScheme::Argon2id);
        let stored = argon.hash_password("secret").unwrap();
        assert!(stored.starts_with(ARGON2_PREFIX));

        let legacy = PasswordHasher::default();
        assert!(legacy.verify_password("secret", &stored).unwrap());
        assert!(!legacy.verify_password("wrong", &stored).unwrap());
    }

    #[test]
    fn argon2_scheme_still_accepts_sha256_digests() {
        let argon = PasswordHasher::new(PasswordScheme::Argon2id);
        assert!(argon.verify_password("pw", &sha256_hex("pw")).unwrap());
    }
}
