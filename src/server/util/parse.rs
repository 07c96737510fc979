use axum::extract::{rejection::PathRejection, Path};

use crate::server::error::AppError;

/// Reads a positive record id from the path.
///
/// Anything that is not an integer ≥ 1 is reported as not found rather than as a bad
/// request, so probing for ids reveals nothing.
///
/// # Arguments
/// - `path` - The extractor result for the `{id}` segment
/// - `resource` - Resource name used in the debug log
///
/// # Returns
/// - `Ok(i64)` - Parsed id
/// - `Err(AppError::NotFound)` - Missing, malformed or non-positive id
pub fn read_id_param(
    path: Result<Path<i64>, PathRejection>,
    resource: &str,
) -> Result<i64, AppError> {
    match path {
        Ok(Path(id)) if id >= 1 => Ok(id),
        _ => Err(AppError::NotFound(resource.to_string())),
    }
}
