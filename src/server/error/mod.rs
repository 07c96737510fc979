//! Error types and HTTP response handling.
//!
//! This module provides the application's error hierarchy and conversion logic for
//! transforming errors into HTTP responses. `AppError` is the top-level error type that
//! wraps domain-specific errors and implements `IntoResponse` for every endpoint.
//!
//! Errors fall into two classes. Client errors (bad input, failed gates, missing records,
//! edit conflicts, throttling) render a structured body with a caller-facing message.
//! Server errors (database, I/O, timeouts, internal faults) are logged in full and
//! rendered as an opaque 500.

pub mod auth;
pub mod config;
pub mod internal;

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::{
    model::api::{ErrorDto, ValidationErrorDto},
    server::{
        error::{auth::AuthError, config::ConfigError, internal::InternalError},
        util::validator::ValidationErrors,
    },
};

/// Largest request body accepted by the router.
pub const MAX_BODY_BYTES: usize = 1_048_576;

/// Message returned to callers for every server-class failure.
const SERVER_ERROR_MESSAGE: &str =
    "the server encountered a problem and could not process your request";

/// Top-level application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error during startup or environment variable loading.
    #[error(transparent)]
    ConfigErr(#[from] ConfigError),

    /// Authentication or authorization failure.
    ///
    /// Delegates to `AuthError::into_response()` for status code mapping.
    #[error(transparent)]
    AuthErr(#[from] AuthError),

    /// Unexpected condition inside the server's own code.
    #[error(transparent)]
    InternalErr(#[from] InternalError),

    /// Database operation error from SeaORM.
    ///
    /// Results in 500 Internal Server Error with error details logged server-side.
    #[error(transparent)]
    DbErr(#[from] sea_orm::DbErr),

    /// Socket or listener failure.
    #[error(transparent)]
    IoErr(#[from] std::io::Error),

    /// A downstream call exceeded its deadline.
    ///
    /// # Fields
    /// - Name of the operation that timed out
    #[error("{0} timed out")]
    Timeout(&'static str),

    /// Request input failed one or more validation checks.
    ///
    /// Results in 422 Unprocessable Entity with a field-keyed error map.
    #[error("validation failed: {0:?}")]
    ValidationFailed(ValidationErrors),

    /// Malformed request body or parameters.
    ///
    /// Results in 400 Bad Request with the provided error message.
    #[error("{0}")]
    BadRequest(String),

    /// Request body exceeded the configured limit.
    ///
    /// Results in 413 Payload Too Large.
    #[error("body must not be larger than {0} bytes")]
    PayloadTooLarge(usize),

    /// Resource not found error.
    ///
    /// Results in 404 Not Found. The message is logged at debug level only.
    #[error("{0} not found")]
    NotFound(String),

    /// A version-conditioned write found the record at a different version.
    ///
    /// Results in 409 Conflict.
    #[error("edit conflict")]
    EditConflict,

    /// The caller's token bucket was empty.
    ///
    /// Results in 429 Too Many Requests.
    #[error("rate limit exceeded")]
    RateLimitExceeded,
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(err) => AppError::BadRequest(err.body_text()),
            JsonRejection::JsonSyntaxError(_) => {
                AppError::BadRequest("body contains badly-formed JSON".to_string())
            }
            JsonRejection::MissingJsonContentType(_) => {
                AppError::BadRequest("body must be sent as application/json".to_string())
            }
            JsonRejection::BytesRejection(err) if err.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                AppError::PayloadTooLarge(MAX_BODY_BYTES)
            }
            JsonRejection::BytesRejection(_) => {
                AppError::BadRequest("body could not be read".to_string())
            }
            other => AppError::BadRequest(other.body_text()),
        }
    }
}

/// Converts application errors into HTTP responses.
///
/// # Returns
/// - 400 Bad Request - `BadRequest`
/// - 413 Payload Too Large - `PayloadTooLarge`
/// - 404 Not Found - `NotFound`
/// - 409 Conflict - `EditConflict`
/// - 422 Unprocessable Entity - `ValidationFailed`
/// - 429 Too Many Requests - `RateLimitExceeded`
/// - Variable - `AuthErr`, delegated to `AuthError::into_response()`
/// - 500 Internal Server Error - everything else, logged with full detail
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            Self::AuthErr(err) => err.into_response(),
            Self::ValidationFailed(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ValidationErrorDto {
                    error: errors.into_inner(),
                }),
            )
                .into_response(),
            Self::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, Json(ErrorDto { error: msg })).into_response()
            }
            Self::PayloadTooLarge(limit) => (
                StatusCode::PAYLOAD_TOO_LARGE,
                Json(ErrorDto {
                    error: format!("body must not be larger than {} bytes", limit),
                }),
            )
                .into_response(),
            Self::NotFound(what) => {
                tracing::debug!("{} not found", what);
                (
                    StatusCode::NOT_FOUND,
                    Json(ErrorDto {
                        error: "the requested resource could not be found".to_string(),
                    }),
                )
                    .into_response()
            }
            Self::EditConflict => (
                StatusCode::CONFLICT,
                Json(ErrorDto {
                    error: "unable to update the record due to an edit conflict, please try again"
                        .to_string(),
                }),
            )
                .into_response(),
            Self::RateLimitExceeded => (
                StatusCode::TOO_MANY_REQUESTS,
                Json(ErrorDto {
                    error: "rate limit exceeded".to_string(),
                }),
            )
                .into_response(),
            err => InternalServerError(err).into_response(),
        }
    }
}

/// Wrapper type for converting any displayable error into a 500 Internal Server Error response.
///
/// Logs the error message and returns a generic message to the client to avoid leaking
/// implementation details.
pub struct InternalServerError<E>(pub E);

impl<E: std::fmt::Display> IntoResponse for InternalServerError<E> {
    fn into_response(self) -> Response {
        tracing::error!(error = %self.0, "request failed");

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorDto {
                error: SERVER_ERROR_MESSAGE.to_string(),
            }),
        )
            .into_response()
    }
}
