//! Request authentication and the permission gate chain.
//!
//! `authenticate` runs on every request and attaches a `Principal` to the request
//! extensions. Handlers then build an `AuthGuard` over that principal and call the gate
//! for the trust level they need. Each gate calls the one below it, so requiring a
//! permission also requires activation and authentication.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use sea_orm::DatabaseConnection;

use crate::server::{
    data::{permission::PermissionRepository, token::TokenRepository},
    error::{auth::AuthError, AppError},
    model::{token::TokenScope, user::User},
    service::token::TOKEN_LENGTH,
    state::AppState,
    util::deadline::with_deadline,
};

/// The identity a request acts as.
#[derive(Debug, Clone, PartialEq)]
pub enum Principal {
    Anonymous,
    Authenticated(User),
}

/// Permission codes a route may require.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    MoviesRead,
    MoviesWrite,
}

impl Permission {
    pub fn code(&self) -> &'static str {
        match self {
            Self::MoviesRead => "movies:read",
            Self::MoviesWrite => "movies:write",
        }
    }
}

/// Resolves the principal from the `Authorization` header.
///
/// # Returns
/// - `Ok(Principal::Anonymous)` - No `Authorization` header, or an empty one
/// - `Ok(Principal::Authenticated)` - A live authentication token
/// - `Err(AuthError::InvalidCredential)` - Header is not `Bearer <token>`, or the token is
///   malformed, unknown or expired
pub async fn resolve_principal(
    db: &DatabaseConnection,
    headers: &HeaderMap,
) -> Result<Principal, AppError> {
    // An empty header carries no credential at all.
    let Some(value) = headers
        .get(header::AUTHORIZATION)
        .filter(|value| !value.is_empty())
    else {
        return Ok(Principal::Anonymous);
    };

    let value = value.to_str().map_err(|_| AuthError::InvalidCredential)?;
    let mut parts = value.split(' ');
    let (Some("Bearer"), Some(plaintext), None) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(AuthError::InvalidCredential.into());
    };

    if plaintext.len() != TOKEN_LENGTH {
        return Err(AuthError::InvalidCredential.into());
    }

    let user = with_deadline(
        "token lookup",
        TokenRepository::new(db).find_user_for_token(
            TokenScope::Authentication,
            plaintext,
            Utc::now(),
        ),
    )
    .await?
    .ok_or(AuthError::InvalidCredential)?;

    Ok(Principal::Authenticated(user))
}

/// Middleware attaching the request's `Principal`.
///
/// Every response, including rejections, varies on `Authorization`.
pub async fn authenticate(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let resolved = resolve_principal(&state.db, req.headers()).await;

    let mut response = match resolved {
        Ok(principal) => {
            req.extensions_mut().insert(principal);
            next.run(req).await
        }
        Err(err) => err.into_response(),
    };

    response
        .headers_mut()
        .append(header::VARY, HeaderValue::from_static("Authorization"));

    response
}

pub struct AuthGuard<'a> {
    db: &'a DatabaseConnection,
    principal: &'a Principal,
}

impl<'a> AuthGuard<'a> {
    pub fn new(db: &'a DatabaseConnection, principal: &'a Principal) -> Self {
        Self { db, principal }
    }

    /// # Returns
    /// - `Ok(&User)` - The request carries a valid authentication token
    /// - `Err(AuthError::AuthenticationRequired)` - Anonymous request
    pub fn require_authenticated(&self) -> Result<&'a User, AppError> {
        match self.principal {
            Principal::Authenticated(user) => Ok(user),
            Principal::Anonymous => Err(AuthError::AuthenticationRequired.into()),
        }
    }

    /// # Returns
    /// - `Ok(&User)` - Authenticated and activated
    /// - `Err(AuthError::InactiveAccount)` - Authenticated but not activated
    pub fn require_activated(&self) -> Result<&'a User, AppError> {
        let user = self.require_authenticated()?;

        if !user.activated {
            return Err(AuthError::InactiveAccount(user.id).into());
        }

        Ok(user)
    }

    /// Requires an activated user holding every listed permission.
    ///
    /// The user's codes are loaded once per call.
    ///
    /// # Returns
    /// - `Ok(&User)` - All permissions held
    /// - `Err(AuthError::NotPermitted)` - The first missing permission
    pub async fn require(&self, permissions: &[Permission]) -> Result<&'a User, AppError> {
        let user = self.require_activated()?;

        let codes = with_deadline(
            "permission lookup",
            PermissionRepository::new(self.db).codes_for_user(user.id),
        )
        .await?;

        for permission in permissions {
            if !codes.iter().any(|code| code == permission.code()) {
                return Err(AuthError::NotPermitted {
                    user_id: user.id,
                    code: permission.code(),
                }
                .into());
            }
        }

        Ok(user)
    }

    pub async fn require_permission(&self, permission: Permission) -> Result<&'a User, AppError> {
        self.require(&[permission]).await
    }
}
