//! Transat Campus Gateway
//!
//! Keeps a second-by-second laundry countdown in sync with the Transat API and
//! serves it alongside the restaurant menu, API statistics and app downloads.

mod api;
mod auth;
mod config;
mod errors;
mod laundry;
mod models;
mod status;
mod upstream;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use laundry::{LaundryPoller, PollerSettings};
use status::StatusMonitor;
use upstream::TransatClient;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub client: TransatClient,
    pub laundry: Arc<LaundryPoller>,
    pub status: Arc<StatusMonitor>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Build the state without starting any timers.
    pub fn new(config: Config) -> Result<Self, errors::AppError> {
        let client = TransatClient::new(&config.upstream_url, config.request_timeout)?;
        let laundry = LaundryPoller::new(client.clone(), PollerSettings::from(&config));
        let status = StatusMonitor::new(client.clone(), config.status_interval);

        Ok(Self {
            client,
            laundry,
            status,
            config: Arc::new(config),
        })
    }

    pub fn start(&self) {
        self.laundry.start();
        self.status.start();
    }

    pub fn stop(&self) {
        self.laundry.stop();
        self.status.stop();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Transat gateway");
    tracing::info!("Upstream: {}", config.upstream_url);
    tracing::info!("Bind address: {}", config.bind_addr);

    if config.api_psk.is_none() {
        tracing::warn!("No API PSK configured (TRANSAT_API_PSK). Manual refresh is open!");
    }

    let bind_addr = config.bind_addr;
    let state = AppState::new(config)?;
    state.start();

    let app = create_router(state.clone());

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Server listening on {}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.stop();
    tracing::info!("Transat gateway stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let psk = state.config.api_psk.clone();

    // Manual refresh triggers upstream traffic, so it sits behind the PSK
    let control_routes = Router::new()
        .route("/laundry/refresh", post(api::refresh_laundry))
        .layer(middleware::from_fn(move |req, next| {
            auth::require_psk(psk.clone(), req, next)
        }));

    let api_routes = Router::new()
        .route("/laundry", get(api::get_laundry))
        .route("/status", get(api::get_status))
        .route("/statistics", get(api::get_statistics))
        .route("/restaurant", get(api::get_restaurant))
        .route("/downloads", get(api::get_downloads))
        .merge(control_routes);

    Router::new()
        .nest("/api", api_routes)
        .route("/health", get(health_check))
        .route("/download", get(api::download_redirect))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
