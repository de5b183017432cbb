//! Smart Disaster Risk Prediction Server
//!
//! Web form for flood and earthquake risk prediction.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  DISASTER RISK SERVER                       │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐   ┌─────────────┐   ┌──────────┐   ┌───────┐ │
//! │  │ Form/API  │──▶│ Classifiers │──▶│ SMS Alert│──▶│ Store │ │
//! │  │ (Axum)    │   │ (ONNX x4)   │   │ (SNS)    │   │(MySQL)│ │
//! │  └───────────┘   └─────────────┘   └──────────┘   └───────┘ │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod alert;
mod config;
mod db;
mod error;
mod handlers;
mod inference;
mod models;
mod pipeline;
mod view;

#[cfg(test)]
mod testing;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
    compression::CompressionLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::alert::{SmsGateway, SnsGateway};
use crate::db::{MySqlStore, RecordStore};
use crate::inference::ModelRegistry;
use crate::models::{EarthquakeInput, FloodInput};

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();

    // Initialize logging
    init_tracing();

    let config = config::Config::from_env().context("Failed to load configuration")?;

    tracing::info!("Disaster risk server starting ({})...", config.environment);
    tracing::info!("Database: {}", config.database.display_target());

    // Classifiers are a startup precondition
    let models = ModelRegistry::load_dir(&config.model_dir)
        .with_context(|| format!("Failed to load models from {}", config.model_dir.display()))?;

    let gateway = SnsGateway::new(&config.gateway).await;
    let store = MySqlStore::new(&config.database);

    if config.auto_migrate {
        tracing::info!("Running database migrations...");
        db::run_migrations(&store).await.context("Failed to run migrations")?;
    }

    // Build application state
    let state = AppState {
        models: Arc::new(models),
        gateway: Arc::new(gateway),
        store: Arc::new(store),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "disaster_risk=debug,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);

    if std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json")) {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub models: Arc<ModelRegistry>,
    pub gateway: Arc<dyn SmsGateway>,
    pub store: Arc<dyn RecordStore>,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    // HTML form
    let page_routes = Router::new()
        .route("/", get(handlers::page::index))
        .route("/predict/flood", post(handlers::page::submit::<FloodInput>))
        .route("/predict/earthquake", post(handlers::page::submit::<EarthquakeInput>));

    // JSON API
    let api_routes = Router::new()
        .route("/health", get(handlers::health::check))
        .route("/api/v1/tracks", get(handlers::tracks::list))
        .route("/api/v1/predict/flood", post(handlers::predict::submit::<FloodInput>))
        .route("/api/v1/predict/earthquake", post(handlers::predict::submit::<EarthquakeInput>));

    Router::new()
        .merge(page_routes)
        .merge(api_routes)
        .fallback(handlers::not_found)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}
