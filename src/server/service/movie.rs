use sea_orm::DatabaseConnection;

use crate::server::{
    data::movie::MovieRepository,
    error::AppError,
    model::movie::{Metadata, Movie, MovieFields, MovieFilter, MoviePatch, PaginatedMovies},
    service::concurrency::{resolve, Existence},
    util::deadline::with_deadline,
};

pub struct MovieService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> MovieService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Validates and stores a new movie.
    pub async fn create(&self, fields: MovieFields) -> Result<Movie, AppError> {
        let fields = fields.into_valid()?;

        with_deadline("movie insert", MovieRepository::new(self.db).create(fields)).await
    }

    /// Fetches a movie or reports it missing.
    pub async fn get(&self, id: i64) -> Result<Movie, AppError> {
        with_deadline("movie lookup", MovieRepository::new(self.db).get_by_id(id))
            .await?
            .ok_or_else(|| AppError::NotFound(format!("movie {}", id)))
    }

    /// Applies a partial update on top of the stored movie.
    ///
    /// The movie is read first, so a write that touches nothing is an edit conflict.
    ///
    /// # Arguments
    /// - `id` - Movie to update
    /// - `version` - Version the caller's representation was read at
    /// - `patch` - Fields to change; absent ones keep their stored value
    ///
    /// # Returns
    /// - `Ok(Movie)` - Updated movie at `version + 1`
    /// - `Err(AppError::NotFound)` - No such movie
    /// - `Err(AppError::ValidationFailed)` - Merged fields are invalid
    /// - `Err(AppError::EditConflict)` - The movie is no longer at `version`
    pub async fn update(&self, id: i64, version: i32, patch: MoviePatch) -> Result<Movie, AppError> {
        let current = self.get(id).await?;
        let fields = patch.apply(current.fields()).into_valid()?;

        let outcome = with_deadline(
            "movie update",
            MovieRepository::new(self.db).update_if_version(id, version, fields),
        )
        .await?;

        resolve(outcome, Existence::Verified, "movie", || async {
            Ok::<_, AppError>(true)
        })
        .await
    }

    /// Replaces every field of a movie without reading it first.
    ///
    /// # Returns
    /// - `Ok(Movie)` - Replaced movie at `version + 1`
    /// - `Err(AppError::NotFound)` - No such movie
    /// - `Err(AppError::ValidationFailed)` - Fields are invalid
    /// - `Err(AppError::EditConflict)` - The movie exists but is no longer at `version`
    pub async fn replace(&self, id: i64, version: i32, fields: MovieFields) -> Result<Movie, AppError> {
        let fields = fields.into_valid()?;
        let db = self.db;

        let outcome = with_deadline(
            "movie update",
            MovieRepository::new(db).update_if_version(id, version, fields),
        )
        .await?;

        resolve(outcome, Existence::Unverified, "movie", || async move {
            let repo = MovieRepository::new(db);
            with_deadline("movie lookup", repo.exists(id)).await
        })
        .await
    }

    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        let deleted = with_deadline("movie delete", MovieRepository::new(self.db).delete(id)).await?;

        if deleted {
            Ok(())
        } else {
            Err(AppError::NotFound(format!("movie {}", id)))
        }
    }

    pub async fn list(&self, filter: MovieFilter) -> Result<PaginatedMovies, AppError> {
        let (movies, total) = with_deadline(
            "movie list",
            MovieRepository::new(self.db).get_paginated(&filter),
        )
        .await?;

        Ok(PaginatedMovies {
            movies,
            metadata: Metadata::calculate(total, filter.page, filter.page_size),
        })
    }
}
