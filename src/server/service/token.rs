//! Token issuance and the email/password exchange for authentication tokens.

use chrono::{Duration, Utc};
use rand::Rng;
use sea_orm::DatabaseConnection;

use crate::server::{
    data::{token::TokenRepository, user::UserRepository},
    error::{auth::AuthError, AppError},
    model::{
        token::{IssuedToken, TokenScope},
        user::{validate_email, validate_password_plaintext},
    },
    util::{deadline::with_deadline, password, validator::ValidationErrors},
};

/// Length of every token plaintext.
pub const TOKEN_LENGTH: usize = 26;

/// Lifetime of a token issued by `create_authentication_token`.
const AUTHENTICATION_TTL_HOURS: i64 = 24;

/// Generates a random base32 plaintext for a new token.
pub fn generate_plaintext() -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

    let mut rng = rand::rng();

    (0..TOKEN_LENGTH)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

/// Checks the shape of a token plaintext under `field`.
pub fn validate_plaintext(v: &mut ValidationErrors, field: &str, plaintext: &str) {
    v.check(!plaintext.is_empty(), field, "must be provided");
    v.check(
        plaintext.len() == TOKEN_LENGTH,
        field,
        "must be 26 bytes long",
    );
}

pub struct TokenService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> TokenService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Issues and stores a token for the user.
    ///
    /// # Returns
    /// - `Ok(IssuedToken)` - The token, plaintext included; only its hash was stored
    pub async fn issue(
        &self,
        user_id: i64,
        ttl: Duration,
        scope: TokenScope,
    ) -> Result<IssuedToken, AppError> {
        let token = IssuedToken {
            plaintext: generate_plaintext(),
            user_id,
            expiry: Utc::now() + ttl,
            scope,
        };

        with_deadline("token insert", TokenRepository::new(self.db).create(&token)).await?;

        Ok(token)
    }

    /// Exchanges an email/password pair for a 24 hour authentication token.
    ///
    /// # Returns
    /// - `Ok(IssuedToken)` - Credentials matched
    /// - `Err(AppError::ValidationFailed)` - Malformed email or password
    /// - `Err(AuthError::InvalidCredentials)` - Unknown email or wrong password
    pub async fn create_authentication_token(
        &self,
        email: String,
        password: String,
    ) -> Result<IssuedToken, AppError> {
        let mut v = ValidationErrors::new();
        validate_email(&mut v, &email);
        validate_password_plaintext(&mut v, &password);
        v.finish()?;

        let user = with_deadline("user lookup", UserRepository::new(self.db).find_by_email(&email))
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !password::matches(password, user.password_hash).await? {
            return Err(AuthError::InvalidCredentials.into());
        }

        self.issue(
            user.id,
            Duration::hours(AUTHENTICATION_TTL_HOURS),
            TokenScope::Authentication,
        )
        .await
    }
}
