mod cors;
mod health;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use overdub_config::Config;
use overdub_media::MediaToolkit;
use overdub_storage::ObjectStore;
use tower_http::trace::TraceLayer;

/// Assembled server with all routes and middleware
pub struct Server {
    router: Router,
    listen_address: SocketAddr,
}

impl Server {
    /// Build the server from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the object store or combine pipeline fail to
    /// initialize
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = overdub_storage::build_store(&config.storage)?;
        Self::with_store(config, store).await
    }

    /// Build the server around an already constructed object store
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the combine
    /// pipeline fails to initialize
    pub async fn with_store(config: Config, store: Arc<dyn ObjectStore>) -> anyhow::Result<Self> {
        config.validate()?;

        let listen_address = config
            .server
            .listen_address
            .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 8080)));

        // A missing toolkit only fails requests that reach the decoder, so keep serving
        if let Err(e) = MediaToolkit::from_config(&config.media).check().await {
            tracing::warn!(error = %e, "media toolkit unavailable; combine requests will fail");
        }

        let combine_state = overdub_combine::build_server(&config, store)?;

        let mut app = Router::new();

        if config.server.health.enabled {
            app = app.route(&config.server.health.path, axum::routing::get(health::health_handler));
        }

        app = app.merge(overdub_combine::endpoint_router().with_state(combine_state));

        app = app.layer(TraceLayer::new_for_http());

        if let Some(ref cors_config) = config.server.cors {
            app = app.layer(cors::cors_layer(cors_config));
        }

        Ok(Self {
            router: app,
            listen_address,
        })
    }

    /// Get the configured listen address
    #[must_use]
    pub const fn listen_address(&self) -> SocketAddr {
        self.listen_address
    }

    /// Consume the server and return the inner router
    ///
    /// Useful for testing when the caller manages the listener
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Start serving requests
    ///
    /// Blocks until the cancellation token is triggered.
    ///
    /// # Errors
    ///
    /// Returns an error if binding the TCP listener or serving fails
    pub async fn serve(self, shutdown: tokio_util::sync::CancellationToken) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.listen_address).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!(%local_addr, "server listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.cancelled().await;
                tracing::info!("graceful shutdown initiated");
            })
            .await?;

        Ok(())
    }
}
