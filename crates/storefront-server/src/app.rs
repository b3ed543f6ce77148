//! Axum application builder.
//!
//! Routes:
//! - `GET /health` - Liveness and database readiness
//! - `GET /api/products` - Catalog with cached ratings
//! - `POST /api/reviews` - Submit a review
//! - `GET /api/reviews?product_id=N` - Reviews of a product
//! - `GET /api/products/{id}/reviews` - Reviews of a product (path form)
//! - `POST /api/contact` - Contact form

use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::middleware::request_id;
use crate::routes::{contact, health, products, reviews};
use crate::state::AppState;

/// Create the Axum application with all routes.
pub fn create_app(state: AppState) -> Router {
    // The storefront front end is served from a different origin.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(Duration::from_secs(3600));

    Router::new()
        .route("/health", get(health::health))
        .route("/api/products", get(products::list_products))
        .route(
            "/api/products/{id}/reviews",
            get(reviews::list_product_reviews),
        )
        .route(
            "/api/reviews",
            get(reviews::list_reviews).post(reviews::submit_review),
        )
        .route("/api/contact", post(contact::submit_contact))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(request_id))
        .layer(cors)
        // State
        .with_state(state)
}

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Host to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    /// Get bind address.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Bind and serve until Ctrl-C or SIGTERM.
pub async fn serve(config: &ServerConfig, state: AppState) -> anyhow::Result<()> {
    let address = config.bind_addr();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|e| anyhow::anyhow!("failed to bind {address}: {e}"))?;
    info!(%address, "storefront API listening");

    axum::serve(listener, create_app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("received Ctrl+C, shutting down"),
            Err(e) => {
                warn!(error = %e, "failed to listen for Ctrl+C");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("received terminate signal, shutting down");
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
