//! Account registration and activation.

use chrono::Duration;
use sea_orm::{DatabaseConnection, SqlErr};
use serde_json::json;

use crate::server::{
    background::BackgroundTasks,
    data::{permission::PermissionRepository, token::TokenRepository, user::UserRepository},
    error::AppError,
    mailer::Mailer,
    middleware::auth::Permission,
    model::{
        token::TokenScope,
        user::{CreateUserParams, RegisterUserParams, User},
    },
    service::{
        concurrency::{resolve, Existence},
        token::{validate_plaintext, TokenService},
    },
    util::{deadline::with_deadline, password, validator::ValidationErrors},
};

const ACTIVATION_TTL_DAYS: i64 = 3;
pub const WELCOME_TEMPLATE: &str = "user_welcome";

pub struct UserService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> UserService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates an unactivated account and mails its activation token in the background.
    ///
    /// New accounts are granted `movies:read`.
    ///
    /// # Returns
    /// - `Ok(User)` - Account created; the welcome email may still be in flight
    /// - `Err(AppError::ValidationFailed)` - Invalid input or email already registered
    pub async fn register(
        &self,
        params: RegisterUserParams,
        tasks: &BackgroundTasks,
        mailer: &Mailer,
    ) -> Result<User, AppError> {
        let mut v = ValidationErrors::new();
        params.validate(&mut v);
        v.finish()?;

        let password_hash = password::hash(params.password).await?;

        let created = with_deadline(
            "user insert",
            UserRepository::new(self.db).create(CreateUserParams {
                name: params.name,
                email: params.email,
                password_hash,
                activated: false,
            }),
        )
        .await;

        let user = match created {
            Ok(user) => user,
            Err(AppError::DbErr(err))
                if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) =>
            {
                let mut v = ValidationErrors::new();
                v.add("email", "a user with this email address already exists");
                return Err(AppError::ValidationFailed(v));
            }
            Err(err) => return Err(err),
        };

        with_deadline(
            "permission grant",
            PermissionRepository::new(self.db)
                .add_for_user(user.id, &[Permission::MoviesRead.code()]),
        )
        .await?;

        let token = TokenService::new(self.db)
            .issue(
                user.id,
                Duration::days(ACTIVATION_TTL_DAYS),
                TokenScope::Activation,
            )
            .await?;

        let mailer = mailer.clone();
        let recipient = user.email.clone();
        let data = json!({
            "activationToken": token.plaintext,
            "userID": user.id,
        });
        tasks.spawn("welcome email", async move {
            mailer.send(&recipient, WELCOME_TEMPLATE, data).await
        });

        Ok(user)
    }

    /// Activates the account owning an activation token.
    ///
    /// The owner is read through the token, so a write that touches nothing is an edit
    /// conflict. All of the user's activation tokens are removed afterwards.
    ///
    /// # Returns
    /// - `Ok(User)` - Activated user at its next version
    /// - `Err(AppError::ValidationFailed)` - Malformed, unknown or expired token
    /// - `Err(AppError::EditConflict)` - The account changed concurrently
    pub async fn activate(&self, plaintext: String) -> Result<User, AppError> {
        let mut v = ValidationErrors::new();
        validate_plaintext(&mut v, "token", &plaintext);
        v.finish()?;

        let tokens = TokenRepository::new(self.db);
        let Some(mut user) = with_deadline(
            "token lookup",
            tokens.find_user_for_token(TokenScope::Activation, &plaintext, chrono::Utc::now()),
        )
        .await?
        else {
            let mut v = ValidationErrors::new();
            v.add("token", "invalid or expired activation token");
            return Err(AppError::ValidationFailed(v));
        };

        user.activated = true;
        let outcome = with_deadline(
            "user update",
            UserRepository::new(self.db).update_if_version(user),
        )
        .await?;
        let user = resolve(outcome, Existence::Verified, "user", || async {
            Ok::<_, AppError>(true)
        })
        .await?;

        with_deadline(
            "token delete",
            tokens.delete_all_for_user(TokenScope::Activation, user.id),
        )
        .await?;

        Ok(user)
    }
}
