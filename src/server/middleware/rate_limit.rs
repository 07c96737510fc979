//! Per-client token bucket throttling.
//!
//! Every caller, identified by peer IP address, owns an independent bucket that refills
//! continuously at `rps` tokens per second up to `burst`. The whole map lives behind one
//! mutex owned by the registry; `allow` and `sweep` hold it for their full critical
//! section. A background sweeper evicts clients idle for longer than the configured
//! threshold so the map does not grow without bound.

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};
use tokio::{task::JoinHandle, time::Instant};

use crate::server::{
    config::LimiterConfig,
    error::{internal::InternalError, AppError},
    state::AppState,
};

#[derive(Debug, Clone)]
struct ClientRecord {
    tokens: f64,
    last_refill: Instant,
    last_seen: Instant,
}

pub struct ClientLimiterRegistry {
    config: LimiterConfig,
    clients: Mutex<HashMap<String, ClientRecord>>,
}

impl ClientLimiterRegistry {
    pub fn new(config: LimiterConfig) -> Self {
        Self {
            config,
            clients: Mutex::new(HashMap::new()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, ClientRecord>> {
        self.clients.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Consumes one token from `identity`'s bucket.
    ///
    /// Unseen identities start with a full bucket. The client's last-seen time moves
    /// forward whether or not the call is admitted. When the limiter is disabled every
    /// call is admitted and no bucket is created.
    ///
    /// # Returns
    /// - `true` - A token was available and consumed
    /// - `false` - The bucket held less than one token
    pub fn allow(&self, identity: &str) -> bool {
        if !self.config.enabled {
            return true;
        }

        let now = Instant::now();
        let burst = f64::from(self.config.burst);
        let mut clients = self.lock();

        let record = clients
            .entry(identity.to_string())
            .or_insert_with(|| ClientRecord {
                tokens: burst,
                last_refill: now,
                last_seen: now,
            });

        let elapsed = now.saturating_duration_since(record.last_refill);
        record.tokens = (record.tokens + elapsed.as_secs_f64() * self.config.rps).min(burst);
        record.last_refill = now;
        record.last_seen = now;

        if record.tokens >= 1.0 {
            record.tokens -= 1.0;
            true
        } else {
            false
        }
    }

    /// Evicts every client idle for longer than the configured threshold.
    ///
    /// # Returns
    /// - `usize` - Number of clients removed
    pub fn sweep(&self) -> usize {
        let threshold = self.config.idle_threshold();
        let now = Instant::now();
        let mut clients = self.lock();

        let before = clients.len();
        clients.retain(|_, record| now.saturating_duration_since(record.last_seen) <= threshold);

        before - clients.len()
    }

    /// Number of clients currently tracked.
    fn len(&self) -> usize {
        self.lock().len()
    }

    #[cfg(test)]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Starts the periodic sweep on its own tokio task.
    ///
    /// The first sweep happens one full interval after the call. Abort the returned
    /// handle to stop sweeping.
    pub fn spawn_sweeper(self: Arc<Self>) -> JoinHandle<()> {
        let period = self.config.sweep_interval;

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            loop {
                ticker.tick().await;
                let evicted = self.sweep();
                if evicted > 0 {
                    tracing::debug!(evicted, remaining = self.len(), "swept idle rate limit clients");
                }
            }
        })
    }
}

/// Middleware rejecting callers whose bucket is empty.
///
/// Requires the router to be served with `into_make_service_with_connect_info`; a request
/// without a peer address is a server error rather than an implicit allow. A disabled
/// limiter passes every request through without reading the address.
pub async fn rate_limit(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if !state.limiter.is_enabled() {
        return Ok(next.run(req).await);
    }

    let Some(ConnectInfo(addr)) = req.extensions().get::<ConnectInfo<SocketAddr>>() else {
        return Err(InternalError::MissingClientAddress.into());
    };

    if !state.limiter.allow(&addr.ip().to_string()) {
        return Err(AppError::RateLimitExceeded);
    }

    Ok(next.run(req).await)
}
