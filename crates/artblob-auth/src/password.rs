//! Argon2id password hashing and verification.

use argon2::password_hash::rand_core::{OsRng, RngCore};
use argon2::password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version, ARGON2ID_IDENT};
use log::debug;
use thiserror::Error;

/// Errors from hashing or verifying a password.
///
/// A wrong password is not an error; [`verify_password`] returns `Ok(false)`.
#[derive(Debug, Error)]
pub enum PasswordError {
    /// The cost parameters are outside what Argon2 accepts.
    #[error("invalid argon2 parameters: {0}")]
    InvalidParams(#[from] argon2::Error),

    /// The stored string is not a well-formed PHC hash, or hashing failed.
    #[error("malformed password hash: {0}")]
    Malformed(#[from] password_hash::Error),

    /// The stored hash uses a different algorithm.
    #[error("unsupported hash algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// The stored hash uses a different Argon2 version.
    #[error("incompatible argon2 version: {0:?}")]
    UnsupportedVersion(Option<u32>),
}

/// Argon2id cost parameters used for new hashes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordParams {
    /// Memory cost in KiB.
    pub memory_kib: u32,
    /// Number of passes.
    pub iterations: u32,
    /// Degree of parallelism (lanes).
    pub parallelism: u32,
    /// Random salt length in bytes.
    pub salt_len: usize,
    /// Derived hash length in bytes.
    pub output_len: usize,
}

impl Default for PasswordParams {
    fn default() -> Self {
        Self {
            memory_kib: 64 * 1024,
            iterations: 1,
            parallelism: 4,
            salt_len: 16,
            output_len: 32,
        }
    }
}

impl PasswordParams {
    fn hasher(&self) -> Result<Argon2<'static>, PasswordError> {
        let params = Params::new(
            self.memory_kib,
            self.iterations,
            self.parallelism,
            Some(self.output_len),
        )?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

/// Hash `plaintext` with the default parameters.
pub fn hash_password(plaintext: &str) -> Result<String, PasswordError> {
    hash_password_with(plaintext, &PasswordParams::default())
}

/// Hash `plaintext` with a fresh random salt and the given parameters.
pub fn hash_password_with(plaintext: &str, params: &PasswordParams) -> Result<String, PasswordError> {
    let hasher = params.hasher()?;

    let mut salt_bytes = vec![0u8; params.salt_len];
    OsRng.fill_bytes(&mut salt_bytes);
    let salt = SaltString::encode_b64(&salt_bytes)?;

    let hash = hasher.hash_password(plaintext.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Check `plaintext` against a stored PHC string.
///
/// The hash is re-derived with the memory, time, parallelism and output
/// length recorded in `encoded` and compared in constant time.
///
/// # Errors
///
/// Returns an error if `encoded` cannot be parsed, is not Argon2id, or is not
/// version 19. A mismatching password is `Ok(false)`.
pub fn verify_password(plaintext: &str, encoded: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(encoded)?;

    if parsed.algorithm != ARGON2ID_IDENT {
        return Err(PasswordError::UnsupportedAlgorithm(
            parsed.algorithm.to_string(),
        ));
    }
    if parsed.version != Some(Version::V0x13.into()) {
        return Err(PasswordError::UnsupportedVersion(parsed.version));
    }

    match Argon2::default().verify_password(plaintext.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => {
            debug!("password mismatch");
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}
