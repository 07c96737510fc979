//! User data repository.
//!
//! Provides the `UserRepository` for account rows. Changes to an existing user go through
//! the same version-conditioned write as movies.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter,
};

use crate::server::{
    model::user::{CreateUserParams, User},
    service::concurrency::ConditionalUpdate,
};

pub struct UserRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> UserRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Inserts a user at version 1.
    ///
    /// # Returns
    /// - `Ok(User)` - The created user
    /// - `Err(DbErr)` - Database error, including a unique violation on `email`
    pub async fn create(&self, params: CreateUserParams) -> Result<User, DbErr> {
        let entity = entity::user::ActiveModel {
            created_at: ActiveValue::Set(Utc::now()),
            name: ActiveValue::Set(params.name),
            email: ActiveValue::Set(params.email),
            password_hash: ActiveValue::Set(params.password_hash),
            activated: ActiveValue::Set(params.activated),
            version: ActiveValue::Set(1),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Ok(User::from_entity(entity))
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, DbErr> {
        let entity = entity::prelude::User::find()
            .filter(entity::user::Column::Email.eq(email))
            .one(self.db)
            .await?;

        Ok(entity.map(User::from_entity))
    }

    /// Writes `user`'s fields and bumps its version, iff the stored version still equals
    /// `user.version`.
    ///
    /// # Returns
    /// - `Ok(ConditionalUpdate::Applied(User))` - The user as written, at `user.version + 1`
    /// - `Ok(ConditionalUpdate::ZeroAffected)` - No user with that id at that version, or
    ///   `user.version` is the last representable version
    /// - `Err(DbErr)` - Database error
    pub async fn update_if_version(&self, user: User) -> Result<ConditionalUpdate<User>, DbErr> {
        let Some(next_version) = user.version.checked_add(1) else {
            return Ok(ConditionalUpdate::ZeroAffected);
        };

        let changes = entity::user::ActiveModel {
            name: ActiveValue::Set(user.name),
            email: ActiveValue::Set(user.email),
            password_hash: ActiveValue::Set(user.password_hash),
            activated: ActiveValue::Set(user.activated),
            version: ActiveValue::Set(next_version),
            ..Default::default()
        };

        let mut updated = entity::prelude::User::update_many()
            .set(changes)
            .filter(entity::user::Column::Id.eq(user.id))
            .filter(entity::user::Column::Version.eq(user.version))
            .exec_with_returning(self.db)
            .await?;

        Ok(match updated.pop() {
            Some(entity) => ConditionalUpdate::Applied(User::from_entity(entity)),
            None => ConditionalUpdate::ZeroAffected,
        })
    }
}
