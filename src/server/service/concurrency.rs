//! Classification of version-conditioned writes.
//!
//! Repositories perform the write as one conditional statement that bumps `version` only
//! when the stored version equals the one the caller presented. A write that touched
//! nothing is either an edit conflict or a missing record; which one depends on whether
//! the record's existence was established earlier in the same request.

use std::future::Future;

use crate::server::error::AppError;

/// Result of a version-conditioned write at the storage boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionalUpdate<T> {
    /// The stored version matched and the write committed.
    Applied(T),
    /// No row matched both the id and the expected version.
    ZeroAffected,
}

/// What the caller knows about the record before the write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Existence {
    /// A successful read in this request already found the record.
    Verified,
    /// The record was never read; zero affected rows need a follow-up existence check.
    Unverified,
}

/// Turns a conditional write outcome into the caller-facing result.
///
/// # Arguments
/// - `outcome` - What the conditional write reported
/// - `existence` - Whether the record was read earlier in the request
/// - `resource` - Name used when reporting a missing record
/// - `exists` - Existence check, only awaited for an unverified zero-affected write
///
/// # Returns
/// - `Ok(T)` - The write committed
/// - `Err(AppError::EditConflict)` - The record exists at a different version
/// - `Err(AppError::NotFound)` - Unverified write and the record is gone
pub async fn resolve<T, F, Fut>(
    outcome: ConditionalUpdate<T>,
    existence: Existence,
    resource: &str,
    exists: F,
) -> Result<T, AppError>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<bool, AppError>>,
{
    match (outcome, existence) {
        (ConditionalUpdate::Applied(value), _) => Ok(value),
        (ConditionalUpdate::ZeroAffected, Existence::Verified) => Err(AppError::EditConflict),
        (ConditionalUpdate::ZeroAffected, Existence::Unverified) => {
            if exists().await? {
                Err(AppError::EditConflict)
            } else {
                Err(AppError::NotFound(resource.to_string()))
            }
        }
    }
}
