use crate::server::{
    data::token::{token_hash, TokenRepository},
    model::token::{IssuedToken, TokenScope},
};
use chrono::{Duration, Utc};
use sea_orm::{DbErr, EntityTrait};
use test_utils::{builder::TestBuilder, factory};

mod create;
mod delete_all_for_user;
mod find_user_for_token;
