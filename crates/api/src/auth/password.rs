//! Argon2id password hashing on the blocking thread pool.
//!
//! Login checks every attempt against a hash, including attempts for unknown
//! emails, so response timing does not reveal which accounts exist.

use std::sync::OnceLock;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

/// Error from hashing or from the blocking task that ran it.
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("password hash error: {0}")]
    Hash(password_hash::Error),

    #[error("hashing task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl From<password_hash::Error> for PasswordError {
    fn from(err: password_hash::Error) -> Self {
        PasswordError::Hash(err)
    }
}

/// Hash compared against when the email is unknown. Computed on first use.
static DUMMY_HASH: OnceLock<String> = OnceLock::new();

fn dummy_hash() -> Result<&'static str, password_hash::Error> {
    if let Some(hash) = DUMMY_HASH.get() {
        return Ok(hash);
    }
    let hash = hash_blocking("antrean-dummy-password")?;
    Ok(DUMMY_HASH.get_or_init(|| hash))
}

fn hash_blocking(password: &str) -> Result<String, password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

fn verify_blocking(password: &str, hash: &str) -> Result<bool, password_hash::Error> {
    let parsed = PasswordHash::new(hash)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Hash a password into a PHC string with a random salt.
pub async fn hash_password(password: &str) -> Result<String, PasswordError> {
    let password = password.to_owned();
    Ok(tokio::task::spawn_blocking(move || hash_blocking(&password)).await??)
}

/// Check a login attempt.
///
/// `stored_hash` is `None` when no account matched the email; the password is
/// then verified against a throwaway hash and the result is always `false`.
pub async fn check_credentials(
    password: &str,
    stored_hash: Option<&str>,
) -> Result<bool, PasswordError> {
    let password = password.to_owned();
    let stored = stored_hash.map(str::to_owned);

    let matched = tokio::task::spawn_blocking(move || -> Result<bool, password_hash::Error> {
        let Some(hash) = stored else {
            return verify_blocking(&password, dummy_hash()?).map(|_| false);
        };
        verify_blocking(&password, &hash)
    })
    .await??;

    Ok(matched)
}
