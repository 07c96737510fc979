//! User domain models and registration parameters.

use chrono::{DateTime, Utc};

use crate::{
    model::user::UserDto,
    server::util::validator::{matches_email, ValidationErrors},
};

/// A registered account.
///
/// Users are versioned like movies so activation cannot race a concurrent change.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub name: String,
    pub email: String,
    /// bcrypt hash of the password.
    pub password_hash: String,
    pub activated: bool,
    pub version: i32,
}

impl User {
    pub fn into_dto(self) -> UserDto {
        UserDto {
            id: self.id,
            created_at: self.created_at,
            name: self.name,
            email: self.email,
            activated: self.activated,
        }
    }

    pub fn from_entity(entity: entity::user::Model) -> Self {
        Self {
            id: entity.id,
            created_at: entity.created_at,
            name: entity.name,
            email: entity.email,
            password_hash: entity.password_hash,
            activated: entity.activated,
            version: entity.version,
        }
    }
}

/// Input for a new account, with the password still in plaintext.
#[derive(Debug, Clone)]
pub struct RegisterUserParams {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl RegisterUserParams {
    pub fn validate(&self, v: &mut ValidationErrors) {
        v.check(!self.name.is_empty(), "name", "must be provided");
        v.check(
            self.name.len() <= 500,
            "name",
            "must not be more than 500 bytes long",
        );

        validate_email(v, &self.email);
        validate_password_plaintext(v, &self.password);
    }
}

/// Input for a user row, password already hashed.
#[derive(Debug, Clone)]
pub struct CreateUserParams {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub activated: bool,
}

pub fn validate_email(v: &mut ValidationErrors, email: &str) {
    v.check(!email.is_empty(), "email", "must be provided");
    v.check(matches_email(email), "email", "must be a valid email address");
}

/// bcrypt ignores input past 72 bytes, so longer passwords are rejected outright.
pub fn validate_password_plaintext(v: &mut ValidationErrors, password: &str) {
    v.check(!password.is_empty(), "password", "must be provided");
    v.check(
        password.len() >= 8,
        "password",
        "must be at least 8 bytes long",
    );
    v.check(
        password.len() <= 72,
        "password",
        "must not be more than 72 bytes long",
    );
}
