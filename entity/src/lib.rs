//! SeaORM entity definitions for the catalogue database.

pub mod movie;
pub mod permission;
pub mod prelude;
pub mod token;
pub mod user;
pub mod user_permission;
