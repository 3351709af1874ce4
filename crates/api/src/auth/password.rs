//! Argon2id password hashing and verification.
//!
//! All password hashes use the Argon2id variant with a cryptographically
//! random salt generated via [`OsRng`], so the same plaintext yields a
//! different hash on every call. The PHC string format is used for storage
//! so that algorithm parameters and salt are embedded in the hash itself;
//! verification therefore keeps working after the work factor is raised.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};

/// One-way password hashing with a runtime-configured work factor.
pub struct CredentialVerifier {
    argon2: Argon2<'static>,
}

impl CredentialVerifier {
    /// Build a verifier whose iteration count is `work_factor` (minimum 1).
    ///
    /// Memory and parallelism stay at the Argon2id defaults; the iteration
    /// count is the knob raised as hardware improves.
    pub fn new(work_factor: u32) -> Self {
        let params = Params::new(
            Params::DEFAULT_M_COST,
            work_factor.max(1),
            Params::DEFAULT_P_COST,
            None,
        )
        .expect("Argon2 parameters must be valid");

        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        }
    }

    /// Hash a plaintext password with a fresh random salt.
    ///
    /// Returns the PHC-formatted hash string (includes algorithm, params,
    /// salt, and hash).
    pub fn hash(&self, password: &str) -> Result<String, argon2::password_hash::Error> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self.argon2.hash_password(password.as_bytes(), &salt)?;
        Ok(hash.to_string())
    }

    /// Verify a plaintext password against a stored PHC-formatted hash.
    ///
    /// Returns `Ok(true)` if the password matches, `Ok(false)` if it does
    /// not. Neither the plaintext nor the hash is logged or echoed back.
    pub fn verify(
        &self,
        password: &str,
        hash: &str,
    ) -> Result<bool, argon2::password_hash::Error> {
        let parsed_hash = PasswordHash::new(hash)?;
        match self
            .argon2
            .verify_password(password.as_bytes(), &parsed_hash)
        {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(e),
        }
    }
}
