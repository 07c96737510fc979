use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

/// Error envelope for every client-visible failure except validation.
#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct ErrorDto {
    pub error: String,
}

/// Error envelope for failed input validation, keyed by field name.
#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct ValidationErrorDto {
    pub error: BTreeMap<String, String>,
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct MessageDto {
    pub message: String,
}
