//! Wire-level DTOs shared by every endpoint.
//!
//! These types define the JSON shapes accepted and returned by the API. Server-side domain
//! models convert into them at the controller boundary.

pub mod api;
pub mod health;
pub mod movie;
pub mod token;
pub mod user;
