//! HTTP request handlers.
//!
//! Controllers extract and convert request input, run the gate a route needs, call one
//! service method and render the result. They hold no business rules of their own.

pub mod health;
pub mod movie;
pub mod token;
pub mod user;

#[cfg(test)]
mod test;
