//! Tour Server - interactive drive tour planning over REST

use anyhow::{Context, Result};
use axum::routing::get;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tour_core::CandidatePool;
use tour_providers::{loader_for, HttpSettings, NominatimGeocoder, OsrmRouter};
use tour_server::config::Config;
use tour_server::state::AppState;
use tour_server::{api, loops};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env()
            .add_directive("tour_server=debug".parse()?)
            .add_directive("tour_core=debug".parse()?))
        .init();

    tracing::info!("Starting Tour Server...");

    let config = Config::from_env();
    config
        .planner
        .validate()
        .context("invalid planner configuration")?;

    let mut settings = HttpSettings {
        timeout: Duration::from_secs(config.http_timeout_s),
        ..HttpSettings::default()
    };
    if let Some(user_agent) = &config.user_agent {
        settings.user_agent = user_agent.clone();
    }

    // The dataset is loaded once; without it no plan can be offered.
    let loader = loader_for(&config.dataset_source, &settings)?;
    let municipalities = loader
        .load()
        .await
        .with_context(|| format!("loading dataset from {}", config.dataset_source))?;
    let pool = Arc::new(CandidatePool::new(municipalities)?);
    tracing::info!("Loaded {} municipalities", pool.len());

    let geocoder = Arc::new(NominatimGeocoder::new(&config.nominatim_url, &settings)?);
    let router = Arc::new(OsrmRouter::new(&config.osrm_url, &settings)?);
    let state = Arc::new(AppState::new(pool, geocoder, router, config.planner.clone()));

    // Start background loops
    let (shutdown_tx, _) = broadcast::channel::<()>(1);
    let expiry = tokio::spawn(loops::session_expiry_loop::run_session_expiry_loop(
        state.clone(),
        config.clone(),
        shutdown_tx.subscribe(),
    ));

    // Build the app
    let app = api::routes()
        .route("/health", get(|| async { "OK" }))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Run server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            tracing::info!("Shutdown signal received");
        })
        .await?;

    shutdown_tx.send(()).ok();
    expiry.await.ok();
    Ok(())
}
