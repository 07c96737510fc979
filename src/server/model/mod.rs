//! Server-side domain models and parameter types.
//!
//! Domain models are converted from entity models at the repository boundary and into DTOs
//! at the controller boundary.

pub mod movie;
pub mod token;
pub mod user;
