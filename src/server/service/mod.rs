//! Service layer for business logic and orchestration.
//!
//! Services sit between the controllers and the repositories. They validate domain
//! input, bound every store call with a deadline, and classify version-conditioned
//! writes into edit conflicts or missing records.

pub mod concurrency;
pub mod movie;
pub mod token;
pub mod user;
