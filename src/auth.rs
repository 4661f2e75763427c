//! Collector accounts and password checks
//!
//! Passwords are stored as `salt$hex(sha256(salt ":" password))` with a
//! random salt per account.

use crate::config::AccountConfig;
use crate::storage::{Storage, StorageResult, User};
use sha2::{Digest, Sha256};
use uuid::Uuid;

fn digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(b":");
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// Hashes a password with a fresh random salt
pub fn hash_password(password: &str) -> String {
    let salt = Uuid::new_v4().simple().to_string();
    format!("{}${}", salt, digest(&salt, password))
}

/// Checks a password against a stored hash
///
/// Malformed stored hashes never verify.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let Some((salt, expected)) = stored.split_once('$') else {
        return false;
    };

    let actual = digest(salt, password);
    if actual.len() != expected.len() {
        return false;
    }

    // Compare every byte so timing does not leak the matching prefix
    actual
        .bytes()
        .zip(expected.bytes())
        .fold(0u8, |diff, (a, b)| diff | (a ^ b))
        == 0
}

/// Returns the user if the credentials are valid
pub fn authenticate(
    storage: &dyn Storage,
    username: &str,
    password: &str,
) -> StorageResult<Option<User>> {
    let user = storage.get_user_by_username(username)?;
    Ok(user.filter(|user| verify_password(password, &user.password_hash)))
}

/// Creates the configured account unless a user with that name exists
///
/// An existing account keeps its stored password.
pub fn ensure_account(storage: &mut dyn Storage, account: &AccountConfig) -> StorageResult<User> {
    if let Some(user) = storage.get_user_by_username(&account.username)? {
        tracing::debug!("Account {} already exists", account.username);
        return Ok(user);
    }

    let user = storage.create_user(&account.username, &hash_password(&account.password))?;
    tracing::info!("Created account {}", user.username);
    Ok(user)
}
