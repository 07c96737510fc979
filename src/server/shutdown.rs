//! Server lifecycle: `Running -> Draining -> Stopped`.
//!
//! The coordinator owns the HTTP acceptor and the background task tracker. A trigger
//! (SIGINT, SIGTERM or `ShutdownHandle::trigger`) moves the server to `Draining` exactly
//! once. The acceptor then stops taking connections, in-flight exchanges get the
//! configured grace period, and background tasks are drained before the state becomes
//! `Stopped`.

use axum::Router;
use std::{future::IntoFuture, net::SocketAddr, sync::Arc};
use tokio::{net::TcpListener, sync::watch};

use crate::server::{background::BackgroundTasks, config::ShutdownConfig, error::AppError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Running,
    Draining,
    Stopped,
}

/// Cloneable trigger for the `Running -> Draining` transition.
#[derive(Clone)]
pub struct ShutdownHandle {
    state: Arc<watch::Sender<LifecycleState>>,
}

impl ShutdownHandle {
    /// Starts draining the server.
    ///
    /// # Returns
    /// - `true` - This call performed the transition
    /// - `false` - The server was already draining or stopped
    pub fn trigger(&self) -> bool {
        self.state.send_if_modified(|state| {
            if *state == LifecycleState::Running {
                *state = LifecycleState::Draining;
                true
            } else {
                false
            }
        })
    }

    #[cfg(test)]
    pub fn state(&self) -> LifecycleState {
        *self.state.borrow()
    }

    /// Triggers shutdown when the process receives SIGINT or SIGTERM.
    pub fn trigger_on_signal(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let signal = termination_signal().await;
            tracing::info!(signal, "shutting down server");
            self.trigger();
        })
    }
}

/// Resolves with the name of the first termination signal received.
///
/// A handler that fails to install is logged and never resolves, leaving the other one
/// in charge.
pub async fn termination_signal() -> &'static str {
    let interrupt = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to install SIGINT handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = interrupt => "SIGINT",
        _ = terminate => "SIGTERM",
    }
}

/// Resolves once the lifecycle has left `Running`.
async fn draining(mut state: watch::Receiver<LifecycleState>) {
    // A dropped sender means the coordinator is gone; stop either way.
    let _ = state
        .wait_for(|state| *state != LifecycleState::Running)
        .await;
}

pub struct ShutdownCoordinator {
    tasks: BackgroundTasks,
    config: ShutdownConfig,
    state: Arc<watch::Sender<LifecycleState>>,
}

impl ShutdownCoordinator {
    pub fn new(tasks: BackgroundTasks, config: ShutdownConfig) -> Self {
        let (state, _) = watch::channel(LifecycleState::Running);

        Self {
            tasks,
            config,
            state: Arc::new(state),
        }
    }

    pub fn handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            state: self.state.clone(),
        }
    }

    /// Serves `router` on `listener` until the server is stopped.
    ///
    /// Peer addresses are attached to every request as `ConnectInfo<SocketAddr>`.
    ///
    /// # Returns
    /// - `Ok(())` - Clean stop after a trigger
    /// - `Err(AppError::Timeout)` - The grace period ran out with exchanges still open
    /// - `Err(AppError::IoErr)` - The acceptor failed
    ///
    /// Background tasks are drained before either error is returned.
    pub async fn run(self, listener: TcpListener, router: Router) -> Result<(), AppError> {
        let addr = listener.local_addr()?;
        tracing::info!(addr = %addr, "starting server");

        let server = axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(draining(self.state.subscribe()))
        .into_future();
        tokio::pin!(server);

        let served: Result<(), AppError> = tokio::select! {
            result = &mut server => result.map_err(AppError::from),
            _ = draining(self.state.subscribe()) => {
                match tokio::time::timeout(self.config.grace, &mut server).await {
                    Ok(result) => result.map_err(AppError::from),
                    Err(_) => {
                        tracing::warn!(
                            grace_secs = self.config.grace.as_secs_f64(),
                            "grace period elapsed with requests still in flight"
                        );
                        Err(AppError::Timeout("in-flight request drain"))
                    }
                }
            }
        };

        // The acceptor is closed from here on, whichever way it ended.
        self.state.send_if_modified(|state| {
            let was_running = *state == LifecycleState::Running;
            *state = LifecycleState::Draining;
            was_running
        });

        tracing::info!(in_flight = self.tasks.in_flight(), "completing background tasks");
        if !self.tasks.drain_for(self.config.drain_timeout).await {
            tracing::warn!(
                in_flight = self.tasks.in_flight(),
                "background task drain timed out"
            );
        }

        self.state.send_replace(LifecycleState::Stopped);

        match served {
            Ok(()) => {
                tracing::info!(addr = %addr, "stopped server");
                Ok(())
            }
            Err(err) => {
                tracing::error!(error = %err, "server stopped with an error");
                Err(err)
            }
        }
    }
}
