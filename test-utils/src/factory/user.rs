//! User factory for creating test user entities.

use crate::factory::{helpers::next_id, permission::grant_permission};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating test users with customizable fields.
///
/// # Example
///
/// ```rust,ignore
/// let user = UserFactory::new(&db)
///     .email("alice@example.com")
///     .activated(true)
///     .permissions(&["movies:read", "movies:write"])
///     .build()
///     .await?;
/// ```
pub struct UserFactory<'a> {
    db: &'a DatabaseConnection,
    name: String,
    email: String,
    password_hash: String,
    activated: bool,
    permissions: Vec<String>,
}

impl<'a> UserFactory<'a> {
    /// Creates a new UserFactory with default values.
    ///
    /// Defaults:
    /// - name: `"User {id}"`
    /// - email: `"user{id}@example.com"`
    /// - password_hash: a placeholder that never verifies
    /// - activated: `false`
    /// - permissions: none
    pub fn new(db: &'a DatabaseConnection) -> Self {
        let id = next_id();
        Self {
            db,
            name: format!("User {}", id),
            email: format!("user{}@example.com", id),
            password_hash: "not-a-bcrypt-hash".to_string(),
            activated: false,
            permissions: Vec::new(),
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    /// Sets a pre-computed bcrypt hash for the user's password.
    pub fn password_hash(mut self, password_hash: impl Into<String>) -> Self {
        self.password_hash = password_hash.into();
        self
    }

    pub fn activated(mut self, activated: bool) -> Self {
        self.activated = activated;
        self
    }

    /// Grants the given permission codes once the user is inserted.
    pub fn permissions(mut self, codes: &[&str]) -> Self {
        self.permissions = codes.iter().map(|c| c.to_string()).collect();
        self
    }

    /// Builds and inserts the user entity into the database.
    ///
    /// # Returns
    /// - `Ok(entity::user::Model)` - Created user entity at version 1
    /// - `Err(DbErr)` - Database error during insert
    pub async fn build(self) -> Result<entity::user::Model, DbErr> {
        let user = entity::user::ActiveModel {
            created_at: ActiveValue::Set(Utc::now()),
            name: ActiveValue::Set(self.name),
            email: ActiveValue::Set(self.email),
            password_hash: ActiveValue::Set(self.password_hash),
            activated: ActiveValue::Set(self.activated),
            version: ActiveValue::Set(1),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        for code in &self.permissions {
            grant_permission(self.db, user.id, code).await?;
        }

        Ok(user)
    }
}

/// Creates an unactivated user with default values.
pub async fn create_user(db: &DatabaseConnection) -> Result<entity::user::Model, DbErr> {
    UserFactory::new(db).build().await
}
