//! tests/common/mod.rs
//! Shared helpers to spawn the Axum app on an ephemeral port.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{serve, Router};
use health_entities::api::blood_pressure::repository::{
    BloodPressureRepository, InMemoryBloodPressureRepository,
};
use health_entities::config::environment::EnvironmentVariables;
use health_entities::config::state::AppState;
use health_entities::core::server::{create_app, create_app_with_table};
use health_entities::database::DatabaseService;
use health_entities::routing::RouteTable;
use tokio::net::TcpListener as TokioTcpListener;

/// State backed by a fresh in-memory store
pub fn test_state(env: EnvironmentVariables) -> AppState {
    test_state_with_repository(env, Arc::new(InMemoryBloodPressureRepository::new()))
}

pub fn test_state_with_repository(
    env: EnvironmentVariables,
    repository: Arc<dyn BloodPressureRepository>,
) -> AppState {
    let env: Arc<EnvironmentVariables> = Arc::new(env);
    let database: DatabaseService = DatabaseService::new(env.clone());
    AppState::with_repository(env, database, repository)
}

/// Spawns the full application with default configuration and returns its base URL.
pub fn spawn_app() -> String {
    spawn_router(create_app(test_state(EnvironmentVariables::default())))
}

/// Spawns the application shell around a custom route table.
pub fn spawn_app_with_table(env: EnvironmentVariables, table: RouteTable<AppState>) -> String {
    spawn_router(create_app_with_table(test_state(env), table))
}

/// Spawns any router on a random unused port and returns its base URL.
pub fn spawn_router(app: Router) -> String {
    // * Bind an ephemeral port using std::net::TcpListener.
    let std_listener: std::net::TcpListener = std::net::TcpListener::bind("127.0.0.1:0")
        .expect("Failed to bind random port");
    std_listener.set_nonblocking(true).unwrap();

    // * Convert std::net::TcpListener to tokio::net::TcpListener.
    let tokio_listener: TokioTcpListener = TokioTcpListener::from_std(std_listener)
        .expect("Failed to convert to tokio listener");

    let addr: std::net::SocketAddr = tokio_listener.local_addr().unwrap();

    // * Spawn the server in a background task.
    tokio::spawn(async move {
        serve(tokio_listener, app)
            .await
            .expect("Server failed");
    });

    // * Return the base URL, e.g. "http://127.0.0.1:12345".
    format!("http://{}", addr)
}
