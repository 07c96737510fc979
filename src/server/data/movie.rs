//! Movie data repository.
//!
//! Every write that changes an existing movie goes through `update_if_version`, a single
//! `UPDATE ... WHERE id = ? AND version = ?` statement. The store serializes concurrent
//! writers; no application lock is held across the read-then-write gap.

use chrono::Utc;
use sea_orm::{
    sea_query::LikeExpr, ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Select,
};

use crate::server::{
    error::{internal::InternalError, AppError},
    model::movie::{Movie, MovieFilter, SortColumn, SortDirection, ValidMovieFields},
    service::concurrency::ConditionalUpdate,
};

pub struct MovieRepository<'a> {
    db: &'a DatabaseConnection,
}

fn encode_genres(genres: &[String]) -> Result<String, AppError> {
    serde_json::to_string(genres).map_err(|e| {
        InternalError::Decode {
            column: "movie.genres",
            reason: e.to_string(),
        }
        .into()
    })
}
/// `LIKE` pattern matching `needle` anywhere, with `%`, `_` and backslash taken literally.
/// `LIKE` pattern matching `needle` anywhere, with `%`, `_` and `\\` taken literally.
fn containing(needle: &str) -> LikeExpr {
    let escaped = needle
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");

    LikeExpr::new(format!("%{}%", escaped)).escape('\\')
}

impl<'a> MovieRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Inserts a movie at version 1.
    pub async fn create(&self, fields: ValidMovieFields) -> Result<Movie, AppError> {
        let entity = entity::movie::ActiveModel {
            created_at: ActiveValue::Set(Utc::now()),
            title: ActiveValue::Set(fields.title),
            year: ActiveValue::Set(fields.year),
            runtime: ActiveValue::Set(fields.runtime),
            genres: ActiveValue::Set(encode_genres(&fields.genres)?),
            version: ActiveValue::Set(1),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Movie::from_entity(entity)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<Movie>, AppError> {
        entity::prelude::Movie::find_by_id(id)
            .one(self.db)
            .await?
            .map(Movie::from_entity)
            .transpose()
    }

    pub async fn exists(&self, id: i64) -> Result<bool, DbErr> {
        let count = entity::prelude::Movie::find_by_id(id).count(self.db).await?;
        Ok(count > 0)
    }

    /// Replaces the movie's fields and bumps its version, iff the stored version is still
    /// `expected_version`.
    ///
    /// # Returns
    /// - `Ok(ConditionalUpdate::Applied(Movie))` - The movie as written, at `expected_version + 1`
    /// - `Ok(ConditionalUpdate::ZeroAffected)` - No movie with that id at that version, or
    ///   `expected_version` is the last representable version
    /// - `Err(AppError)` - Database error
    pub async fn update_if_version(
        &self,
        id: i64,
        expected_version: i32,
        fields: ValidMovieFields,
    ) -> Result<ConditionalUpdate<Movie>, AppError> {
        // No stored movie can be at a version past the last representable one.
        let Some(next_version) = expected_version.checked_add(1) else {
            return Ok(ConditionalUpdate::ZeroAffected);
        };

        let changes = entity::movie::ActiveModel {
            title: ActiveValue::Set(fields.title),
            year: ActiveValue::Set(fields.year),
            runtime: ActiveValue::Set(fields.runtime),
            genres: ActiveValue::Set(encode_genres(&fields.genres)?),
            version: ActiveValue::Set(next_version),
            ..Default::default()
        };

        let mut updated = entity::prelude::Movie::update_many()
            .set(changes)
            .filter(entity::movie::Column::Id.eq(id))
            .filter(entity::movie::Column::Version.eq(expected_version))
            .exec_with_returning(self.db)
            .await?;

        match updated.pop() {
            Some(entity) => Ok(ConditionalUpdate::Applied(Movie::from_entity(entity)?)),
            None => Ok(ConditionalUpdate::ZeroAffected),
        }
    }

    /// Deletes a movie.
    ///
    /// # Returns
    /// - `Ok(true)` - The movie existed and was removed
    /// - `Ok(false)` - No movie with that id
    pub async fn delete(&self, id: i64) -> Result<bool, DbErr> {
        let result = entity::prelude::Movie::delete_by_id(id).exec(self.db).await?;
        Ok(result.rows_affected > 0)
    }

    /// Lists movies matching `filter`, one page at a time.
    ///
    /// Ties in the sort column are broken by ascending id so pages are stable.
    ///
    /// # Returns
    /// - `Ok((movies, total))` - The requested page and the total number of matches
    pub async fn get_paginated(&self, filter: &MovieFilter) -> Result<(Vec<Movie>, u64), AppError> {
        let query = Self::ordered(Self::filtered(filter), filter);
        let paginator = query.paginate(self.db, filter.page_size);

        let total = paginator.num_items().await?;
        let movies = paginator
            .fetch_page(filter.page - 1)
            .await?
            .into_iter()
            .map(Movie::from_entity)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((movies, total))
    }

    fn filtered(filter: &MovieFilter) -> Select<entity::prelude::Movie> {
        let mut query = entity::prelude::Movie::find();

        if !filter.title.is_empty() {
            query = query.filter(entity::movie::Column::Title.like(containing(&filter.title)));
        }

        // Genres are stored as a JSON array, so each wanted genre appears quoted.
        for genre in &filter.genres {
            query = query.filter(
                entity::movie::Column::Genres.like(containing(&format!("\"{}\"", genre))),
            );
        }

        query
    }

    fn ordered(
        query: Select<entity::prelude::Movie>,
        filter: &MovieFilter,
    ) -> Select<entity::prelude::Movie> {
        let column = match filter.sort.column {
            SortColumn::Id => entity::movie::Column::Id,
            SortColumn::Title => entity::movie::Column::Title,
            SortColumn::Year => entity::movie::Column::Year,
            SortColumn::Runtime => entity::movie::Column::Runtime,
        };

        let query = match filter.sort.direction {
            SortDirection::Ascending => query.order_by_asc(column),
            SortDirection::Descending => query.order_by_desc(column),
        };

        query.order_by_asc(entity::movie::Column::Id)
    }
}
