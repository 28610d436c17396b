//! Argon2 password hashing.

use crate::{Error, Result};
use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use secrecy::{ExposeSecret, SecretString};

/// Hashes a plaintext password into a PHC string.
///
/// # Errors
///
/// Returns [`Error::EmptyString`] for a blank password, or
/// [`Error::Unrecoverable`] if hashing fails.
pub fn hash_password(password: &SecretString) -> Result<String> {
    let plain = password.expose_secret();
    if plain.trim().is_empty() {
        return Err(Error::EmptyString { field: "password" });
    }
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| Error::Unrecoverable {
            operation: "hash_password".to_string(),
            cause: e.to_string(),
        })?;
    Ok(hash.to_string())
}

/// Checks a plaintext password against a stored hash.
///
/// # Errors
///
/// Returns [`Error::MissingCredentials`] if the hash is malformed or the
/// password does not match.
pub fn verify_password(password: &SecretString, stored_hash: &str) -> Result<()> {
    let hash = PasswordHash::new(stored_hash).map_err(|e| {
        tracing::error!(error = %e, "failed to parse password hash");
        Error::MissingCredentials { field: "password" }
    })?;
    Argon2::default()
        .verify_password(password.expose_secret().as_bytes(), &hash)
        .map_err(|_| Error::MissingCredentials { field: "password" })
}
