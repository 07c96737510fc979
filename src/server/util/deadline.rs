use std::{future::Future, time::Duration};

use crate::server::error::AppError;

/// Upper bound for any single call a request makes to the store.
pub const QUERY_TIMEOUT: Duration = Duration::from_secs(3);

/// Runs a downstream call under `QUERY_TIMEOUT`.
///
/// Elapsing converts to `AppError::Timeout` for this request only; the underlying future
/// is dropped.
///
/// # Arguments
/// - `operation` - Name used in the timeout error and log line
/// - `fut` - The store call to bound
pub async fn with_deadline<T, E, F>(operation: &'static str, fut: F) -> Result<T, AppError>
where
    F: Future<Output = Result<T, E>>,
    E: Into<AppError>,
{
    match tokio::time::timeout(QUERY_TIMEOUT, fut).await {
        Ok(result) => result.map_err(Into::into),
        Err(_) => Err(AppError::Timeout(operation)),
    }
}
