// Start of file: src/main.rs

use axum::{serve, Router};
use tokio::net::TcpListener;

use health_entities::config::state::AppState;
use health_entities::core::{logging, server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_tracing();

    let state: AppState = AppState::instance().clone();
    state.initialize().await?;

    let app: Router = server::create_app(state.clone());
    let listener: TcpListener = server::setup_listener(&state.environment).await?;

    tracing::info!(
        "Server listening on: {}://{}",
        state.environment.protocol,
        listener.local_addr()?
    );

    serve(listener, app)
        .with_graceful_shutdown(server::shutdown_signal(state)?)
        .await?;

    Ok(())
}

// End of file: src/main.rs
