// Application server configuration and setup

use std::future::Future;
use std::time::Duration;
use axum::{
    Router,
    http::StatusCode,
    middleware::from_fn,
    extract::{DefaultBodyLimit, OriginalUri},
    error_handling::HandleErrorLayer,
};
use serde_json::json;
use tower::{ServiceBuilder, timeout::TimeoutLayer};
use tower_http::trace::TraceLayer;
use tokio::{signal, net::TcpListener};
use listenfd::ListenFd;
use anyhow::{Context, Result};
use tracing::{error, info};

use crate::api::entities::entity_routes;
use crate::config::environment::EnvironmentVariables;
use crate::config::state::AppState;
use crate::routing::RouteTable;
use crate::utils::{
    error_handler::handle_global_error,
    response_handler::{response_wrapper, HandlerResponse},
    utils::normalize_path,
};

/// Creates the application shell: the entity route table under its mount path plus global layers
pub fn create_app(state: AppState) -> Router {
    create_app_with_table(state, entity_routes())
}

/// Same shell around an arbitrary route table
pub fn create_app_with_table(state: AppState, table: RouteTable<AppState>) -> Router {
    let env: std::sync::Arc<EnvironmentVariables> = state.environment.clone();
    let mount: String = normalize_path(&env.entity_mount_path);

    info!(mount = %mount, routes = ?table.paths(), "Mounting entity route table");
    let entities: Router = table.into_router(state);

    // Nesting at the root is not allowed, the table becomes the fallback instead
    let shell: Router = if mount == "/" {
        Router::new().fallback_service(entities)
    } else {
        Router::new()
            .nest_service(&mount, entities)
            .fallback(fallback_handler)
    };

    shell.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(from_fn(response_wrapper))
            .layer(HandleErrorLayer::new(handle_global_error))
            .layer(TimeoutLayer::new(Duration::from_secs(env.default_timeout_seconds)))
            .layer(DefaultBodyLimit::max(env.max_request_body_size))
    )
}

/// Answers paths outside the entity mount
async fn fallback_handler(OriginalUri(uri): OriginalUri) -> HandlerResponse {
    HandlerResponse::new(StatusCode::NOT_FOUND)
        .data(json!({ "error": "not_found", "path": uri.path() }))
        .message("The requested route does not exist")
}

/// Sets up the TCP listener from environment or binds to new address
pub async fn setup_listener(env: &EnvironmentVariables) -> Result<TcpListener> {
    let mut listenfd: ListenFd = ListenFd::from_env();

    let listener: TcpListener = match listenfd.take_tcp_listener(0)? {
        Some(std_listener) => {
            info!("Using socket handed over by the process manager");
            std_listener.set_nonblocking(true)?;
            TcpListener::from_std(std_listener)?
        }
        None => {
            let addr: String = format!("{}:{}", env.host, env.port);
            TcpListener::bind(&addr)
                .await
                .with_context(|| format!("Failed to bind {addr}"))?
        }
    };

    Ok(listener)
}

/// Installs the shutdown signal handlers (Ctrl+C and TERM) and returns the future that resolves
/// once one of them fires and the database connections are closed
pub fn shutdown_signal(state: AppState) -> Result<impl Future<Output = ()>> {
    #[cfg(unix)]
    let mut terminate = signal::unix::signal(signal::unix::SignalKind::terminate())
        .context("Failed to install TERM signal handler")?;

    Ok(async move {
        let ctrl_c = async {
            if let Err(e) = signal::ctrl_c().await {
                // Without a Ctrl+C listener only TERM can stop the server
                error!("Failed to listen for Ctrl+C: {}", e);
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = async move {
            terminate.recv().await;
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => info!("Shutting down via Ctrl+C"),
            _ = terminate => info!("Shutting down via TERM signal"),
        }

        // Gracefully close database connections
        state.shutdown().await;
    })
}
