//! Database repository layer.
//!
//! Repositories wrap SeaORM queries for one table each and convert entity models into
//! domain models at the boundary. They hold no state beyond a borrowed connection.

pub mod movie;
pub mod permission;
pub mod token;
pub mod user;
