use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    model::{
        api::{ErrorDto, ValidationErrorDto},
        token::{AuthTokenEnvelope, CreateAuthTokenDto},
    },
    server::{error::AppError, service::token::TokenService, state::AppState},
};

pub static TOKEN_TAG: &str = "token";

/// Exchange an email and password for a 24 hour authentication token.
///
/// # Returns
/// - `201 Created` - The token plaintext and its expiry
/// - `401 Unauthorized` - Unknown email or wrong password
/// - `422 Unprocessable Entity` - Malformed email or password
#[utoipa::path(
    post,
    path = "/v1/tokens/authentication",
    tag = TOKEN_TAG,
    request_body = CreateAuthTokenDto,
    responses(
        (status = 201, description = "Token issued", body = AuthTokenEnvelope),
        (status = 400, description = "Malformed body", body = ErrorDto),
        (status = 401, description = "Invalid credentials", body = ErrorDto),
        (status = 422, description = "Invalid input", body = ValidationErrorDto)
    ),
)]
pub async fn create_authentication_token(
    State(state): State<AppState>,
    payload: Result<Json<CreateAuthTokenDto>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;

    let token = TokenService::new(&state.db)
        .create_authentication_token(payload.email, payload.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthTokenEnvelope {
            authentication_token: token.into_dto(),
        }),
    ))
}
