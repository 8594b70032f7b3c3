mod auth;
mod health;

use std::net::SocketAddr;

use axum::Router;
use glossa_config::Config;
use tower_http::trace::TraceLayer;

/// Default bind address when none is configured
const DEFAULT_LISTEN: SocketAddr = SocketAddr::new(std::net::IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED), 8088);

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
    /// Returns an error if the translation service cannot be initialized,
    /// most commonly because the upstream API key is missing
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let listen_address = config.server.listen_address.unwrap_or(DEFAULT_LISTEN);

        let translate_state = glossa_translate::build_service(config)?;

        let mut app = Router::new();

        // Health check
        let health = &config.server.health;
        if health.enabled {
            app = app.route(&health.path, axum::routing::get(health::health_handler));
        }

        // Translation routes
        app = app.merge(glossa_translate::endpoint_router().with_state(translate_state));

        // Apply middleware layers (innermost first)

        // Tracing
        app = app.layer(TraceLayer::new_for_http());

        // Master key authentication
        if let Some(ref master_key) = config.server.auth.master_key {
            let master_key = master_key.clone();
            let public_path = health.enabled.then(|| health.path.clone());

            app = app.layer(axum::middleware::from_fn(move |req, next| {
                let master_key = master_key.clone();
                let public_path = public_path.clone();
                async move { auth::auth_middleware(master_key, public_path, req, next).await }
            }));
        } else {
            tracing::warn!("server.auth.master_key is not set, API is open to any caller");
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
    /// Blocks until the cancellation token is triggered. In-flight streams
    /// are allowed to finish.
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
