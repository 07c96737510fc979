//! Token factory for creating authentication and activation tokens.

use crate::factory::helpers::{next_id, token_hash};
use chrono::{DateTime, Duration, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating tokens owned by a user.
///
/// Defaults to a 26 character plaintext, `authentication` scope and an expiry one hour
/// in the future.
pub struct TokenFactory<'a> {
    db: &'a DatabaseConnection,
    user_id: i64,
    plaintext: String,
    scope: String,
    expiry: DateTime<Utc>,
}

impl<'a> TokenFactory<'a> {
    pub fn new(db: &'a DatabaseConnection, user_id: i64) -> Self {
        Self {
            db,
            user_id,
            plaintext: format!("{:A>26}", next_id()),
            scope: "authentication".to_string(),
            expiry: Utc::now() + Duration::hours(1),
        }
    }

    pub fn plaintext(mut self, plaintext: impl Into<String>) -> Self {
        self.plaintext = plaintext.into();
        self
    }

    pub fn scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    pub fn expiry(mut self, expiry: DateTime<Utc>) -> Self {
        self.expiry = expiry;
        self
    }

    /// Inserts the hashed token.
    ///
    /// # Returns
    /// - `Ok((plaintext, model))` - The plaintext to present and the stored row
    /// - `Err(DbErr)` - Database error during insert
    pub async fn build(self) -> Result<(String, entity::token::Model), DbErr> {
        let model = entity::token::ActiveModel {
            hash: ActiveValue::Set(token_hash(&self.plaintext)),
            user_id: ActiveValue::Set(self.user_id),
            expiry: ActiveValue::Set(self.expiry),
            scope: ActiveValue::Set(self.scope),
        }
        .insert(self.db)
        .await?;

        Ok((self.plaintext, model))
    }
}
