//! Server-side API backend and business logic.
//!
//! The backend uses Axum as the web framework and SeaORM for database operations.
//!
//! # Architecture
//!
//! - **Controller Layer** (`controller/`) - HTTP request handlers, access control, and DTO conversion
//! - **Service Layer** (`service/`) - Validation, deadlines, and optimistic concurrency
//! - **Data Layer** (`data/`) - Database operations and entity-to-domain model conversion
//! - **Model Layer** (`model/`) - Domain models and operation-specific parameter types
//! - **Error Layer** (`error/`) - Application error types and HTTP response mapping
//! - **Middleware** (`middleware/`) - Per-client throttling and token authentication
//!
//! # Infrastructure
//!
//! - **Configuration** (`config`) - Environment-based application configuration
//! - **State** (`state`) - Shared application state
//! - **Startup** (`startup`) - Logging and database initialization
//! - **Router** (`router`) - Route table, middleware stack and API documentation
//! - **Background** (`background`) - Tracked tasks that outlive their request
//! - **Shutdown** (`shutdown`) - Signal handling, graceful stop and task drain
//! - **Mailer** (`mailer`) - Outbound notifications
//!
//! # Request Flow
//!
//! 1. **Middleware** recovers panics, traces, applies CORS, throttles the client and
//!    resolves the bearer token into a principal
//! 2. **Controller** runs the route's gate, converts DTOs to params, calls a service
//! 3. **Service** validates, performs deadline-bounded repository calls, and hands
//!    deferred side effects to the background tracker
//! 4. **Controller** converts the domain model to a DTO and responds

pub mod background;
pub mod config;
pub mod controller;
pub mod data;
pub mod error;
pub mod mailer;
pub mod middleware;
pub mod model;
pub mod router;
pub mod service;
pub mod shutdown;
pub mod startup;
pub mod state;
pub mod util;
