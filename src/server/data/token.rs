//! Token data repository.
//!
//! Only the SHA-256 digest of a token is stored. Lookups always name the scope and ignore
//! expired rows, so a token can never be used outside its purpose or lifetime.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter,
};
use sha2::{Digest, Sha256};

use crate::server::model::{
    token::{IssuedToken, TokenScope},
    user::User,
};

/// Hex encoded SHA-256 digest of a token's plaintext.
pub fn token_hash(plaintext: &str) -> String {
    hex::encode(Sha256::digest(plaintext.as_bytes()))
}

pub struct TokenRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> TokenRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Stores the hash of an issued token.
    pub async fn create(&self, token: &IssuedToken) -> Result<(), DbErr> {
        entity::token::ActiveModel {
            hash: ActiveValue::Set(token_hash(&token.plaintext)),
            user_id: ActiveValue::Set(token.user_id),
            expiry: ActiveValue::Set(token.expiry),
            scope: ActiveValue::Set(token.scope.as_str().to_string()),
        }
        .insert(self.db)
        .await?;

        Ok(())
    }

    /// Resolves the owner of an unexpired token in `scope`.
    ///
    /// # Arguments
    /// - `scope` - Purpose the token must have been issued for
    /// - `plaintext` - Token as presented by the caller
    /// - `now` - Tokens expiring at or before this instant are ignored
    ///
    /// # Returns
    /// - `Ok(Some(User))` - Token found and owner loaded
    /// - `Ok(None)` - Unknown, expired or wrongly scoped token
    pub async fn find_user_for_token(
        &self,
        scope: TokenScope,
        plaintext: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<User>, DbErr> {
        let Some(token) = entity::prelude::Token::find_by_id(token_hash(plaintext))
            .filter(entity::token::Column::Scope.eq(scope.as_str()))
            .filter(entity::token::Column::Expiry.gt(now))
            .one(self.db)
            .await?
        else {
            return Ok(None);
        };

        let user = entity::prelude::User::find_by_id(token.user_id)
            .one(self.db)
            .await?;

        Ok(user.map(User::from_entity))
    }

    /// Deletes every token of `scope` owned by the user.
    ///
    /// # Returns
    /// - `Ok(u64)` - Number of tokens removed
    pub async fn delete_all_for_user(&self, scope: TokenScope, user_id: i64) -> Result<u64, DbErr> {
        let result = entity::prelude::Token::delete_many()
            .filter(entity::token::Column::Scope.eq(scope.as_str()))
            .filter(entity::token::Column::UserId.eq(user_id))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }
}
