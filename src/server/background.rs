//! Fire-and-forget work that must finish before the process exits.
//!
//! `BackgroundTasks` runs deferred side effects (welcome emails and the like) on their own
//! tokio tasks while counting how many are still in flight. Each task's panic or error is
//! captured at the task boundary and logged; nothing propagates to the request that
//! spawned it. Shutdown calls `drain` to wait for the count to reach zero.

use std::{
    future::Future,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};
use tokio::sync::Notify;

use crate::server::error::AppError;

#[derive(Default)]
struct Inner {
    in_flight: AtomicUsize,
    idle: Notify,
}

/// Tracker for spawned background tasks.
///
/// Cheap to clone; every clone shares the same counter.
#[derive(Clone, Default)]
pub struct BackgroundTasks {
    inner: Arc<Inner>,
}

/// Decrements the in-flight count when dropped, so completion is recorded on every path.
struct InFlight {
    inner: Arc<Inner>,
}

impl Drop for InFlight {
    fn drop(&mut self) {
        if self.inner.in_flight.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.inner.idle.notify_waiters();
        }
    }
}

impl BackgroundTasks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tasks spawned and not yet finished.
    pub fn in_flight(&self) -> usize {
        self.inner.in_flight.load(Ordering::Acquire)
    }

    /// Runs `task` on its own tokio task.
    ///
    /// The in-flight count is incremented before this returns. A returned error or a panic
    /// inside `task` is logged with `name` and the task counts as finished.
    ///
    /// # Arguments
    /// - `name` - Label used in log lines
    /// - `task` - The deferred work
    pub fn spawn<F>(&self, name: &'static str, task: F)
    where
        F: Future<Output = Result<(), AppError>> + Send + 'static,
    {
        self.inner.in_flight.fetch_add(1, Ordering::AcqRel);
        let guard = InFlight {
            inner: self.inner.clone(),
        };

        tokio::spawn(async move {
            let _guard = guard;

            match tokio::spawn(task).await {
                Ok(Ok(())) => tracing::debug!(task = name, "background task finished"),
                Ok(Err(err)) => tracing::error!(task = name, error = %err, "background task failed"),
                Err(join_err) if join_err.is_panic() => {
                    tracing::error!(task = name, "background task panicked")
                }
                Err(join_err) => {
                    tracing::error!(task = name, error = %join_err, "background task aborted")
                }
            }
        });
    }

    /// Waits until no spawned task is in flight.
    ///
    /// There is no upper bound; a task that never finishes blocks this forever.
    pub async fn drain(&self) {
        loop {
            let idle = self.inner.idle.notified();
            tokio::pin!(idle);
            idle.as_mut().enable();

            if self.in_flight() == 0 {
                return;
            }

            idle.await;
        }
    }

    /// Like `drain`, with an optional upper bound.
    ///
    /// # Returns
    /// - `true` - Every task finished
    /// - `false` - The timeout elapsed with tasks still in flight
    pub async fn drain_for(&self, timeout: Option<Duration>) -> bool {
        match timeout {
            None => {
                self.drain().await;
                true
            }
            Some(limit) => tokio::time::timeout(limit, self.drain()).await.is_ok(),
        }
    }
}
