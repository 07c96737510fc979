//! Field-keyed input validation.
//!
//! Checks accumulate into a `ValidationErrors` map; the first message recorded for a
//! field wins. Callers convert a non-empty map into `AppError::ValidationFailed`.

use regex::Regex;
use std::{
    collections::{BTreeMap, HashSet},
    sync::LazyLock,
};

use crate::server::error::AppError;

static EMAIL_RX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("email pattern is a valid regex")
});

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ValidationErrors {
    errors: BTreeMap<String, String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Records `message` for `field` unless the field already has one.
    pub fn add(&mut self, field: &str, message: &str) {
        self.errors
            .entry(field.to_string())
            .or_insert_with(|| message.to_string());
    }

    /// Records `message` for `field` when `ok` is false.
    pub fn check(&mut self, ok: bool, field: &str, message: &str) {
        if !ok {
            self.add(field, message);
        }
    }

    #[cfg(test)]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn into_inner(self) -> BTreeMap<String, String> {
        self.errors
    }

    /// Converts the accumulated checks into a result.
    pub fn finish(self) -> Result<(), AppError> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(AppError::ValidationFailed(self))
        }
    }
}

pub fn matches_email(value: &str) -> bool {
    EMAIL_RX.is_match(value)
}

pub fn unique(values: &[String]) -> bool {
    let set: HashSet<&String> = values.iter().collect();
    set.len() == values.len()
}

pub fn permitted<T: PartialEq>(value: &T, list: &[T]) -> bool {
    list.contains(value)
}
