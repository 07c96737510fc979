//! Token scopes and freshly issued tokens.

use chrono::{DateTime, Utc};

use crate::model::token::AuthTokenDto;

/// The single purpose a token may be used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenScope {
    Authentication,
    Activation,
}

impl TokenScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Authentication => "authentication",
            Self::Activation => "activation",
        }
    }
}

/// A token whose plaintext is still known. Only the hash is ever stored.
#[derive(Debug, Clone, PartialEq)]
pub struct IssuedToken {
    pub plaintext: String,
    pub user_id: i64,
    pub expiry: DateTime<Utc>,
    pub scope: TokenScope,
}

impl IssuedToken {
    pub fn into_dto(self) -> AuthTokenDto {
        AuthTokenDto {
            token: self.plaintext,
            expiry: self.expiry,
        }
    }
}
