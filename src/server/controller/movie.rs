use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header, StatusCode},
    response::IntoResponse,
    Extension, Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    model::{
        api::{ErrorDto, MessageDto, ValidationErrorDto},
        movie::{CreateMovieDto, MovieEnvelope, MoviesEnvelope, ReplaceMovieDto, UpdateMovieDto},
    },
    server::{
        error::AppError,
        middleware::auth::{AuthGuard, Permission, Principal},
        model::movie::{require_version, MovieFields, MovieFilter, MoviePatch},
        service::movie::MovieService,
        state::AppState,
        util::parse::read_id_param,
    },
};

/// Tag for grouping movie endpoints in OpenAPI documentation
pub static MOVIE_TAG: &str = "movie";

/// Raw list filters. Values stay strings so malformed numbers surface as validation
/// errors rather than extractor rejections.
#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListMoviesQuery {
    /// Case-insensitive title substring
    pub title: Option<String>,
    /// Comma separated genres, all of which must match
    pub genres: Option<String>,
    /// 1-based page number (default: 1)
    pub page: Option<String>,
    /// Items per page (default: 10, max: 100)
    pub page_size: Option<String>,
    /// One of id, title, year, runtime, optionally prefixed with `-`
    pub sort: Option<String>,
}

/// List movies matching the given filters.
///
/// # Access Control
/// - `movies:read`
///
/// # Returns
/// - `200 OK` - A page of movies with pagination metadata
/// - `401 Unauthorized` - Missing or invalid authentication token
/// - `403 Forbidden` - Account inactive or lacks `movies:read`
/// - `422 Unprocessable Entity` - Invalid paging or sort values
#[utoipa::path(
    get,
    path = "/v1/movies",
    tag = MOVIE_TAG,
    params(ListMoviesQuery),
    responses(
        (status = 200, description = "Page of movies", body = MoviesEnvelope),
        (status = 401, description = "Authentication required", body = ErrorDto),
        (status = 403, description = "Not permitted", body = ErrorDto),
        (status = 422, description = "Invalid filters", body = ValidationErrorDto)
    ),
    security(("bearer" = []))
)]
pub async fn list_movies(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    query: Result<Query<ListMoviesQuery>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    AuthGuard::new(&state.db, &principal)
        .require_permission(Permission::MoviesRead)
        .await?;

    let Query(query) = query.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let filter = MovieFilter::from_query(
        query.title,
        query.genres,
        query.page,
        query.page_size,
        query.sort,
    )?;

    let movies = MovieService::new(&state.db).list(filter).await?;

    Ok((StatusCode::OK, Json(movies.into_dto())))
}

/// Create a movie.
///
/// # Access Control
/// - `movies:write`
///
/// # Returns
/// - `201 Created` - The stored movie, with its URL in `Location`
/// - `400 Bad Request` - Malformed JSON or unknown fields
/// - `422 Unprocessable Entity` - Field validation failed
#[utoipa::path(
    post,
    path = "/v1/movies",
    tag = MOVIE_TAG,
    request_body = CreateMovieDto,
    responses(
        (status = 201, description = "Movie created", body = MovieEnvelope),
        (status = 400, description = "Malformed body", body = ErrorDto),
        (status = 401, description = "Authentication required", body = ErrorDto),
        (status = 403, description = "Not permitted", body = ErrorDto),
        (status = 422, description = "Invalid fields", body = ValidationErrorDto)
    ),
    security(("bearer" = []))
)]
pub async fn create_movie(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    payload: Result<Json<CreateMovieDto>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    AuthGuard::new(&state.db, &principal)
        .require_permission(Permission::MoviesWrite)
        .await?;

    let Json(payload) = payload?;
    let movie = MovieService::new(&state.db)
        .create(MovieFields {
            title: payload.title,
            year: payload.year,
            runtime: payload.runtime,
            genres: payload.genres,
        })
        .await?;

    let location = format!("/v1/movies/{}", movie.id);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(MovieEnvelope {
            movie: movie.into_dto(),
        }),
    ))
}

/// Get a movie by id.
///
/// # Access Control
/// - `movies:read`
///
/// # Returns
/// - `200 OK` - The movie
/// - `404 Not Found` - No such movie, or the id is not a positive integer
#[utoipa::path(
    get,
    path = "/v1/movies/{id}",
    tag = MOVIE_TAG,
    params(
        ("id" = i64, Path, description = "Movie id")
    ),
    responses(
        (status = 200, description = "The movie", body = MovieEnvelope),
        (status = 401, description = "Authentication required", body = ErrorDto),
        (status = 403, description = "Not permitted", body = ErrorDto),
        (status = 404, description = "Movie not found", body = ErrorDto)
    ),
    security(("bearer" = []))
)]
pub async fn get_movie(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    AuthGuard::new(&state.db, &principal)
        .require_permission(Permission::MoviesRead)
        .await?;

    let id = read_id_param(path, "movie")?;
    let movie = MovieService::new(&state.db).get(id).await?;

    Ok((
        StatusCode::OK,
        Json(MovieEnvelope {
            movie: movie.into_dto(),
        }),
    ))
}

/// Partially update a movie.
///
/// The body must carry the `version` the caller last read. Absent fields keep their
/// stored value.
///
/// # Access Control
/// - `movies:write`
///
/// # Returns
/// - `200 OK` - The updated movie at its next version
/// - `404 Not Found` - No such movie
/// - `409 Conflict` - The movie changed since `version`
/// - `422 Unprocessable Entity` - Missing version or invalid merged fields
#[utoipa::path(
    patch,
    path = "/v1/movies/{id}",
    tag = MOVIE_TAG,
    params(
        ("id" = i64, Path, description = "Movie id")
    ),
    request_body = UpdateMovieDto,
    responses(
        (status = 200, description = "Movie updated", body = MovieEnvelope),
        (status = 400, description = "Malformed body", body = ErrorDto),
        (status = 404, description = "Movie not found", body = ErrorDto),
        (status = 409, description = "Edit conflict", body = ErrorDto),
        (status = 422, description = "Invalid fields", body = ValidationErrorDto)
    ),
    security(("bearer" = []))
)]
pub async fn update_movie(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateMovieDto>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    AuthGuard::new(&state.db, &principal)
        .require_permission(Permission::MoviesWrite)
        .await?;

    let id = read_id_param(path, "movie")?;
    let Json(payload) = payload?;
    let version = require_version(payload.version)?;

    let movie = MovieService::new(&state.db)
        .update(
            id,
            version,
            MoviePatch {
                title: payload.title,
                year: payload.year,
                runtime: payload.runtime,
                genres: payload.genres,
            },
        )
        .await?;

    Ok((
        StatusCode::OK,
        Json(MovieEnvelope {
            movie: movie.into_dto(),
        }),
    ))
}

/// Replace every field of a movie.
///
/// # Access Control
/// - `movies:write`
///
/// # Returns
/// - `200 OK` - The replaced movie at its next version
/// - `404 Not Found` - No such movie
/// - `409 Conflict` - The movie exists at another version
/// - `422 Unprocessable Entity` - Missing version or invalid fields
#[utoipa::path(
    put,
    path = "/v1/movies/{id}",
    tag = MOVIE_TAG,
    params(
        ("id" = i64, Path, description = "Movie id")
    ),
    request_body = ReplaceMovieDto,
    responses(
        (status = 200, description = "Movie replaced", body = MovieEnvelope),
        (status = 400, description = "Malformed body", body = ErrorDto),
        (status = 404, description = "Movie not found", body = ErrorDto),
        (status = 409, description = "Edit conflict", body = ErrorDto),
        (status = 422, description = "Invalid fields", body = ValidationErrorDto)
    ),
    security(("bearer" = []))
)]
pub async fn replace_movie(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<ReplaceMovieDto>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    AuthGuard::new(&state.db, &principal)
        .require_permission(Permission::MoviesWrite)
        .await?;

    let id = read_id_param(path, "movie")?;
    let Json(payload) = payload?;
    let version = require_version(payload.version)?;

    let movie = MovieService::new(&state.db)
        .replace(
            id,
            version,
            MovieFields {
                title: payload.title,
                year: payload.year,
                runtime: payload.runtime,
                genres: payload.genres,
            },
        )
        .await?;

    Ok((
        StatusCode::OK,
        Json(MovieEnvelope {
            movie: movie.into_dto(),
        }),
    ))
}

/// Delete a movie.
///
/// # Access Control
/// - `movies:write`
///
/// # Returns
/// - `200 OK` - Confirmation message
/// - `404 Not Found` - No such movie
#[utoipa::path(
    delete,
    path = "/v1/movies/{id}",
    tag = MOVIE_TAG,
    params(
        ("id" = i64, Path, description = "Movie id")
    ),
    responses(
        (status = 200, description = "Movie deleted", body = MessageDto),
        (status = 401, description = "Authentication required", body = ErrorDto),
        (status = 403, description = "Not permitted", body = ErrorDto),
        (status = 404, description = "Movie not found", body = ErrorDto)
    ),
    security(("bearer" = []))
)]
pub async fn delete_movie(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    AuthGuard::new(&state.db, &principal)
        .require_permission(Permission::MoviesWrite)
        .await?;

    let id = read_id_param(path, "movie")?;
    MovieService::new(&state.db).delete(id).await?;

    Ok((
        StatusCode::OK,
        Json(MessageDto {
            message: "movie successfully deleted".to_string(),
        }),
    ))
}
