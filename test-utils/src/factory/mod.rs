//! Factory methods for creating test data.
//!
//! Each entity has its own factory module with both a `Factory` struct for customization
//! and a `create_*` convenience function for quick default creation.
//!
//! ```rust,ignore
//! use test_utils::factory;
//!
//! let user = factory::user::UserFactory::new(&db)
//!     .activated(true)
//!     .permissions(&["movies:read"])
//!     .build()
//!     .await?;
//! let (plaintext, _token) = factory::token::TokenFactory::new(&db, user.id)
//!     .build()
//!     .await?;
//! ```
//!
//! # Available Factories
//!
//! - `user` - Create user entities, optionally with granted permission codes
//! - `token` - Create authentication or activation tokens
//! - `permission` - Find-or-create permission rows and grant them
//! - `movie` - Create movie entities
//! - `helpers` - Unique value generation and token hashing

pub mod helpers;
pub mod movie;
pub mod permission;
pub mod token;
pub mod user;

pub use movie::create_movie;
pub use permission::grant_permission;
pub use user::create_user;
