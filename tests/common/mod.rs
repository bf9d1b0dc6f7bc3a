//! Shared utilities for integration testing.

use std::net::SocketAddr;

use tokio::net::TcpListener;
use xhr_fixture::{FixtureConfig, HttpServer, Shutdown};

/// Spawn a fixture server on an ephemeral port with default config.
#[allow(dead_code)]
pub async fn spawn_fixture() -> (SocketAddr, Shutdown) {
    spawn_fixture_with(FixtureConfig::default()).await
}

/// Spawn a fixture server on an ephemeral port with the given config.
///
/// The bind address in the config is ignored; the returned address is
/// the one actually bound. Trigger the returned `Shutdown` to stop it.
#[allow(dead_code)]
pub async fn spawn_fixture_with(config: FixtureConfig) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let server = HttpServer::new(config);
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

/// Client with a cookie store, so session identity carries across
/// requests the way a browser or XHR client would.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .no_proxy()
        .build()
        .unwrap()
}
