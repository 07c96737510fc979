use crate::server::{
    data::movie::MovieRepository,
    error::AppError,
    model::movie::{MovieFilter, MovieSort, ValidMovieFields},
    service::concurrency::ConditionalUpdate,
};
use test_utils::{builder::TestBuilder, factory};

mod create;
mod delete;
mod get_paginated;
mod update_if_version;

fn fields(title: &str) -> ValidMovieFields {
    ValidMovieFields {
        title: title.to_string(),
        year: 1999,
        runtime: 136,
        genres: vec!["action".to_string(), "sci-fi".to_string()],
    }
}
