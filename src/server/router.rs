//! Route table, middleware stack and OpenAPI document.

use std::any::Any;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware::from_fn_with_state,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

use crate::{
    model,
    server::{
        controller::{health, movie, token, user},
        error::{AppError, InternalServerError, MAX_BODY_BYTES},
        middleware::{auth::authenticate, rate_limit::rate_limit},
        state::AppState,
    },
};

#[derive(OpenApi)]
#[openapi(
    info(title = "marquee", version = "v1"),
    paths(
        health::healthcheck,
        movie::list_movies,
        movie::create_movie,
        movie::get_movie,
        movie::update_movie,
        movie::replace_movie,
        movie::delete_movie,
        user::register_user,
        user::activate_user,
        token::create_authentication_token,
    ),
    components(schemas(
        model::api::ErrorDto,
        model::api::ValidationErrorDto,
        model::api::MessageDto,
        model::health::HealthDto,
        model::health::SystemInfoDto,
        model::movie::MovieDto,
        model::movie::CreateMovieDto,
        model::movie::UpdateMovieDto,
        model::movie::ReplaceMovieDto,
        model::movie::MovieEnvelope,
        model::movie::MoviesEnvelope,
        model::movie::MetadataDto,
        model::user::RegisterUserDto,
        model::user::ActivateUserDto,
        model::user::UserDto,
        model::user::UserEnvelope,
        model::token::CreateAuthTokenDto,
        model::token::AuthTokenDto,
        model::token::AuthTokenEnvelope,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "health", description = "Service status"),
        (name = "movie", description = "Movie catalogue"),
        (name = "user", description = "Account registration and activation"),
        (name = "token", description = "Authentication tokens"),
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
            );
        }
    }
}

async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

async fn not_found() -> AppError {
    AppError::NotFound("route".to_string())
}

/// All API routes, without middleware.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/healthcheck", get(health::healthcheck))
        .route(
            "/v1/movies",
            get(movie::list_movies).post(movie::create_movie),
        )
        .route(
            "/v1/movies/{id}",
            get(movie::get_movie)
                .patch(movie::update_movie)
                .put(movie::replace_movie)
                .delete(movie::delete_movie),
        )
        .route("/v1/users", post(user::register_user))
        .route("/v1/users/activated", put(user::activate_user))
        .route(
            "/v1/tokens/authentication",
            post(token::create_authentication_token),
        )
        .route("/v1/openapi.json", get(openapi))
        .fallback(not_found)
}

/// Wraps `routes` in the middleware stack and binds the state.
///
/// From the outside in: panic recovery, request tracing, CORS, body limit, per-client
/// throttling, then authentication.
pub fn with_middleware(routes: Router<AppState>, state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_trusted_origins);

    routes
        .layer(from_fn_with_state(state.clone(), authenticate))
        .layer(from_fn_with_state(state.clone(), rate_limit))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(handle_panic))
        .with_state(state)
}

pub fn router(state: AppState) -> Router {
    with_middleware(routes(), state)
}

/// Reflects `Access-Control-Allow-Origin` for trusted origins only.
fn cors_layer(trusted_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = trusted_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(origin = %origin, error = %e, "ignoring invalid trusted origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::OPTIONS, Method::PUT, Method::PATCH, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}

/// Turns a handler panic into a 500 and closes the connection.
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    let mut response = InternalServerError(format!("handler panicked: {}", detail)).into_response();
    response
        .headers_mut()
        .insert(header::CONNECTION, HeaderValue::from_static("close"));

    response
}
