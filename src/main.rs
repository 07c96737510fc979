mod model;
mod server;

use std::net::SocketAddr;

use tokio::net::TcpListener;

use crate::server::{
    background::BackgroundTasks, config::Config, error::AppError, mailer::Mailer, router,
    shutdown::ShutdownCoordinator, startup, state::AppState,
};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    startup::init_tracing();

    let config = Config::from_env()?;
    let db = startup::connect_to_database(&config).await?;

    let tasks = BackgroundTasks::new();
    let mailer = Mailer::new(config.smtp_sender.clone());
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let shutdown_config = config.shutdown.clone();
    let env = config.env.clone();

    let state = AppState::new(db, config, tasks.clone(), mailer);
    let sweeper = state.limiter.clone().spawn_sweeper();

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, env = %env, "listening");

    let coordinator = ShutdownCoordinator::new(tasks, shutdown_config);
    coordinator.handle().trigger_on_signal();

    let result = coordinator.run(listener, router::router(state)).await;
    sweeper.abort();

    result
}
