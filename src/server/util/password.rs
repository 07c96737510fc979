//! bcrypt hashing on the blocking thread pool.

use crate::server::error::{internal::InternalError, AppError};

#[cfg(not(test))]
const HASH_COST: u32 = 12;
#[cfg(test)]
const HASH_COST: u32 = 4;

pub async fn hash(plaintext: String) -> Result<String, AppError> {
    let hashed = tokio::task::spawn_blocking(move || bcrypt::hash(plaintext, HASH_COST))
        .await
        .map_err(InternalError::from)?
        .map_err(InternalError::from)?;

    Ok(hashed)
}

/// Checks `plaintext` against a stored hash.
///
/// # Returns
/// - `Ok(true)` - Password matches
/// - `Ok(false)` - Password does not match
/// - `Err(AppError::InternalErr)` - The stored hash is malformed or the worker failed
pub async fn matches(plaintext: String, hash: String) -> Result<bool, AppError> {
    let matched = tokio::task::spawn_blocking(move || bcrypt::verify(plaintext, &hash))
        .await
        .map_err(InternalError::from)?
        .map_err(InternalError::from)?;

    Ok(matched)
}
