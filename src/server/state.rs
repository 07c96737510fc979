//! Application state shared across all request handlers.
//!
//! The state is built once during startup and cloned into every request through Axum's
//! state extraction. Every field is cheap to clone: the connection is a pool handle and
//! the rest are reference counted.

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::server::{
    background::BackgroundTasks, config::Config, mailer::Mailer,
    middleware::rate_limit::ClientLimiterRegistry,
};

#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: DatabaseConnection,

    pub config: Arc<Config>,

    /// Per-client token buckets, shared with the idle sweeper.
    pub limiter: Arc<ClientLimiterRegistry>,

    /// Tracker for work that outlives the request that started it.
    ///
    /// The shutdown coordinator drains the same tracker before the process exits.
    pub tasks: BackgroundTasks,

    pub mailer: Mailer,
}

impl AppState {
    /// Creates the state, building the limiter from `config.limiter`.
    ///
    /// # Arguments
    /// - `db` - Database connection pool
    /// - `config` - Loaded application configuration
    /// - `tasks` - Background task tracker, shared with the shutdown coordinator
    /// - `mailer` - Outbound mail sender
    pub fn new(
        db: DatabaseConnection,
        config: Config,
        tasks: BackgroundTasks,
        mailer: Mailer,
    ) -> Self {
        let limiter = Arc::new(ClientLimiterRegistry::new(config.limiter.clone()));

        Self {
            db,
            config: Arc::new(config),
            limiter,
            tasks,
            mailer,
        }
    }
}
