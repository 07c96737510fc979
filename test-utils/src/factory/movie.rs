//! Movie factory for creating test movie entities.

use crate::factory::helpers::next_id;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating movies at version 1.
pub struct MovieFactory<'a> {
    db: &'a DatabaseConnection,
    title: String,
    year: i32,
    runtime: i32,
    genres: Vec<String>,
}

impl<'a> MovieFactory<'a> {
    /// Defaults: title `"Movie {id}"`, year 2001, runtime 120, genres `["drama"]`.
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self {
            db,
            title: format!("Movie {}", next_id()),
            year: 2001,
            runtime: 120,
            genres: vec!["drama".to_string()],
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn year(mut self, year: i32) -> Self {
        self.year = year;
        self
    }

    pub fn runtime(mut self, runtime: i32) -> Self {
        self.runtime = runtime;
        self
    }

    pub fn genres(mut self, genres: &[&str]) -> Self {
        self.genres = genres.iter().map(|g| g.to_string()).collect();
        self
    }

    pub async fn build(self) -> Result<entity::movie::Model, DbErr> {
        let genres = serde_json::to_string(&self.genres)
            .map_err(|e| DbErr::Custom(format!("Failed to encode genres: {}", e)))?;

        entity::movie::ActiveModel {
            created_at: ActiveValue::Set(Utc::now()),
            title: ActiveValue::Set(self.title),
            year: ActiveValue::Set(self.year),
            runtime: ActiveValue::Set(self.runtime),
            genres: ActiveValue::Set(genres),
            version: ActiveValue::Set(1),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }
}

/// Creates a movie with default values.
pub async fn create_movie(db: &DatabaseConnection) -> Result<entity::movie::Model, DbErr> {
    MovieFactory::new(db).build().await
}
