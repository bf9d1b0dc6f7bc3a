//! HTTP server setup.
//!
//! # Responsibilities
//! - Create the Axum router with the scenario catch-all routes
//! - Wire up middleware (session identity, tracing)
//! - Bind to a listener and serve until shutdown
//!
//! Scenario paths are matched by substring containment inside the
//! dispatch handler, so the router only needs catch-all POST routes and
//! guarantees at most one handler runs per request.

use std::sync::Arc;

use axum::{middleware, routing::post, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::config::FixtureConfig;
use crate::http::session;
use crate::scenario;
use crate::upload::SessionStore;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<FixtureConfig>,
    pub sessions: Arc<SessionStore>,
}

/// The fixture's HTTP server.
pub struct HttpServer {
    router: Router,
    config: FixtureConfig,
}

impl HttpServer {
    /// Create a new server with the given configuration.
    pub fn new(config: FixtureConfig) -> Self {
        let state = AppState {
            config: Arc::new(config.clone()),
            sessions: Arc::new(SessionStore::new()),
        };
        let router = Self::build_router(state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/{*path}", post(scenario::dispatch))
            .route("/", post(scenario::dispatch))
            .with_state(state)
            .layer(middleware::from_fn(session::session_layer))
            .layer(TraceLayer::new_for_http())
    }

    /// Serve on the given listener until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "fixture server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("fixture server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &FixtureConfig {
        &self.config
    }
}
