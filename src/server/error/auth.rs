use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::model::api::ErrorDto;

#[derive(Error, Debug)]
pub enum AuthError {
    /// The `Authorization` header was malformed, or its token is unknown or expired.
    ///
    /// Results in 401 Unauthorized with `WWW-Authenticate: Bearer`.
    #[error("invalid or missing authentication token")]
    InvalidCredential,

    /// Email/password pair did not match an account.
    ///
    /// Results in 401 Unauthorized.
    #[error("invalid authentication credentials")]
    InvalidCredentials,

    /// The route requires an authenticated principal but the request was anonymous.
    ///
    /// Results in 401 Unauthorized.
    #[error("authentication required")]
    AuthenticationRequired,

    /// The user has not activated their account.
    ///
    /// Results in 403 Forbidden.
    #[error("user {0} is not activated")]
    InactiveAccount(i64),

    /// The user lacks the permission code required by the route.
    ///
    /// Results in 403 Forbidden.
    #[error("user {user_id} lacks permission {code}")]
    NotPermitted {
        /// The user that was denied
        user_id: i64,
        /// The missing permission code
        code: &'static str,
    },
}

/// Converts authentication errors into HTTP responses.
///
/// Messages are fixed per variant and never carry user ids or codes; those only reach
/// the debug log.
impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        tracing::debug!("{}", self);

        match self {
            Self::InvalidCredential => (
                StatusCode::UNAUTHORIZED,
                [(header::WWW_AUTHENTICATE, "Bearer")],
                Json(ErrorDto {
                    error: "invalid or missing authentication token".to_string(),
                }),
            )
                .into_response(),
            Self::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                Json(ErrorDto {
                    error: "invalid authentication credentials".to_string(),
                }),
            )
                .into_response(),
            Self::AuthenticationRequired => (
                StatusCode::UNAUTHORIZED,
                Json(ErrorDto {
                    error: "you must be authenticated to access this resource".to_string(),
                }),
            )
                .into_response(),
            Self::InactiveAccount(_) => (
                StatusCode::FORBIDDEN,
                Json(ErrorDto {
                    error: "your user account must be activated to access this resource"
                        .to_string(),
                }),
            )
                .into_response(),
            Self::NotPermitted { .. } => (
                StatusCode::FORBIDDEN,
                Json(ErrorDto {
                    error: "your user account doesn't have the necessary permissions to access this resource"
                        .to_string(),
                }),
            )
                .into_response(),
        }
    }
}
