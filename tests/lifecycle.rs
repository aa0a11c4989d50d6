//! tests/lifecycle.rs
//! Server lifecycle helpers: listener setup and shutdown signal installation.

mod common;

use std::time::Duration;

use health_entities::config::environment::EnvironmentVariables;
use health_entities::config::state::AppState;
use health_entities::core::server::{setup_listener, shutdown_signal};

#[tokio::test]
async fn shutdown_signal_installs_handlers_and_waits() {
    let state: AppState = common::test_state(EnvironmentVariables::default());

    let shutdown = shutdown_signal(state).expect("Signal handlers should install");

    // No signal was sent, so the future must still be pending
    let waited = tokio::time::timeout(Duration::from_millis(100), shutdown).await;
    assert!(waited.is_err());
}

#[tokio::test]
async fn setup_listener_binds_configured_address() {
    let env: EnvironmentVariables = EnvironmentVariables {
        port: 0,
        ..EnvironmentVariables::default()
    };

    let listener: tokio::net::TcpListener = setup_listener(&env).await.expect("Listener should bind");
    assert!(listener.local_addr().unwrap().ip().is_loopback());
}

#[tokio::test]
async fn setup_listener_reports_unusable_address() {
    let env: EnvironmentVariables = EnvironmentVariables {
        host: "256.0.0.1".into(),
        ..EnvironmentVariables::default()
    };

    let error: anyhow::Error = setup_listener(&env).await.unwrap_err();
    assert!(error.to_string().contains("Failed to bind 256.0.0.1:3000"));
}
