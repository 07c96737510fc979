//! Request middleware: throttling and authentication.

pub mod auth;
pub mod rate_limit;

#[cfg(test)]
mod test;
