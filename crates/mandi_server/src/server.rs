//! Server startup and binding
//!
//! Provides functionality to start the Axum server with configurable host/port.

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;

use mandi_engine::{CommodityRegistry, EngineConfig, InitReport};

use crate::config::ServerConfig;
use crate::error::ApiError;
use crate::routes::{self, AppState};

/// Server instance that can be started
pub struct Server {
    /// Server configuration
    config: Arc<ServerConfig>,
    /// Shared state (registry)
    state: AppState,
    /// The built router
    router: Router,
}

impl Server {
    /// Create a server over a registry built from `engine`
    pub fn new(config: ServerConfig, engine: &EngineConfig) -> Self {
        let registry = CommodityRegistry::new(engine.registry_settings());
        Self::with_state(config, AppState::new(registry, engine))
    }

    /// Create a server over prepared state
    pub fn with_state(config: ServerConfig, state: AppState) -> Self {
        let router = routes::build_router(state.clone());
        Self {
            config: Arc::new(config),
            state,
            router,
        }
    }

    /// Get the socket address the server will bind to
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Shared application state
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Train the registry now.
    ///
    /// Called before binding when `warm_up` is set; an error here should
    /// abort startup. Commodities left out under the isolate policy are
    /// logged individually.
    pub async fn warm_up(&self) -> Result<Arc<InitReport>, ApiError> {
        let report = self.state.initialise().await?;
        if !report.is_complete() {
            for failure in &report.failures {
                tracing::warn!(
                    commodity = %failure.name,
                    error = %failure.error,
                    "Commodity unavailable"
                );
            }
        }
        tracing::info!(
            trained = report.trained.len(),
            failed = report.failures.len(),
            "Registry warm-up complete"
        );
        Ok(report)
    }

    /// Run the server
    ///
    /// Binds to the configured host/port and serves requests until Ctrl-C.
    /// Warm-up, if configured, is the caller's job (see [`Server::warm_up`]).
    pub async fn run(self) -> Result<(), std::io::Error> {
        let listener = TcpListener::bind(self.socket_addr()).await?;
        self.run_with_listener(listener).await
    }

    /// Run the server with a specific listener
    pub async fn run_with_listener(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_support::{market_state, untrainable_state};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    #[test]
    fn test_server_socket_addr() {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
            ..Default::default()
        };

        let server = Server::new(config, &EngineConfig::default());
        assert_eq!(server.socket_addr(), "127.0.0.1:3000");
        assert!(!server.state().registry.is_initialized());
    }

    #[tokio::test]
    async fn test_warm_up_initialises_registry() {
        let server = Server::with_state(ServerConfig::default(), market_state());

        let report = server.warm_up().await.unwrap();

        assert!(!report.is_complete());
        assert_eq!(report.trained, ["wheat", "rice"]);
        assert!(server.state().registry.is_initialized());
        assert_eq!(server.config().port, 8080);
    }

    #[tokio::test]
    async fn test_warm_up_failure_is_final() {
        let server = Server::with_state(ServerConfig::default(), untrainable_state());

        let err = server.warm_up().await.unwrap_err();
        assert!(matches!(err, ApiError::Unavailable(_)));

        for _ in 0..5 {
            assert!(server.warm_up().await.is_err());
        }
        assert_eq!(server.state().registry.training_runs(), 1);
        assert!(!server.state().registry.is_initialized());
    }

    #[tokio::test]
    async fn test_serves_on_ephemeral_port() {
        let server = Server::with_state(ServerConfig::default(), market_state());
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            server.run_with_listener(listener).await.ok();
        });

        let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
        stream
            .write_all(b"GET /health HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
            .await
            .unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();

        assert!(response.starts_with("HTTP/1.1 200"));
        assert!(response.contains("healthy"));

        handle.abort();
    }
}
