use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    model::{
        api::{ErrorDto, ValidationErrorDto},
        user::{ActivateUserDto, RegisterUserDto, UserEnvelope},
    },
    server::{
        error::AppError, model::user::RegisterUserParams, service::user::UserService,
        state::AppState,
    },
};

pub static USER_TAG: &str = "user";

/// Register a new account.
///
/// The account starts unactivated with `movies:read`. An activation token is mailed in
/// the background, so the response is sent before delivery completes.
///
/// # Returns
/// - `202 Accepted` - Account created
/// - `400 Bad Request` - Malformed JSON or unknown fields
/// - `422 Unprocessable Entity` - Invalid input or email already registered
#[utoipa::path(
    post,
    path = "/v1/users",
    tag = USER_TAG,
    request_body = RegisterUserDto,
    responses(
        (status = 202, description = "Account created", body = UserEnvelope),
        (status = 400, description = "Malformed body", body = ErrorDto),
        (status = 422, description = "Invalid input", body = ValidationErrorDto)
    ),
)]
pub async fn register_user(
    State(state): State<AppState>,
    payload: Result<Json<RegisterUserDto>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;

    let user = UserService::new(&state.db)
        .register(
            RegisterUserParams {
                name: payload.name,
                email: payload.email,
                password: payload.password,
            },
            &state.tasks,
            &state.mailer,
        )
        .await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(UserEnvelope {
            user: user.into_dto(),
        }),
    ))
}

/// Activate an account with its activation token.
///
/// # Returns
/// - `200 OK` - The activated account
/// - `409 Conflict` - The account changed concurrently
/// - `422 Unprocessable Entity` - Malformed, unknown or expired token
#[utoipa::path(
    put,
    path = "/v1/users/activated",
    tag = USER_TAG,
    request_body = ActivateUserDto,
    responses(
        (status = 200, description = "Account activated", body = UserEnvelope),
        (status = 400, description = "Malformed body", body = ErrorDto),
        (status = 409, description = "Edit conflict", body = ErrorDto),
        (status = 422, description = "Invalid token", body = ValidationErrorDto)
    ),
)]
pub async fn activate_user(
    State(state): State<AppState>,
    payload: Result<Json<ActivateUserDto>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;

    let user = UserService::new(&state.db).activate(payload.token).await?;

    Ok((
        StatusCode::OK,
        Json(UserEnvelope {
            user: user.into_dto(),
        }),
    ))
}
