use crate::server::{
    data::user::UserRepository,
    model::user::{CreateUserParams, User},
    service::concurrency::ConditionalUpdate,
};
use sea_orm::{DbErr, SqlErr};
use test_utils::{builder::TestBuilder, factory};

mod create;
mod update_if_version;
