use axum::http::{header, HeaderMap, HeaderValue};
use chrono::{Duration, Utc};
use sea_orm::DbErr;

use crate::server::{
    error::{auth::AuthError, AppError},
    middleware::auth::{resolve_principal, AuthGuard, Permission, Principal},
    model::user::User,
};
use test_utils::{builder::TestBuilder, factory};

mod guard;
mod resolve_principal;

fn bearer(value: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::AUTHORIZATION,
        HeaderValue::from_str(value).unwrap(),
    );
    headers
}
