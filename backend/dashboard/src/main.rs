//! Payment operations dashboard: entry point.
//!
//! Seeds the in-memory payment store with synthetic orders, starts a
//! background ticker that keeps the throughput reading moving, and exposes the
//! dashboard panels as a small Axum REST API.

mod api;
mod auth;
mod config;
mod errors;
mod ticker;

use std::sync::Arc;
use std::time::Duration;

use payops_core::{
    mock_payments, Clock, PaymentStore, SessionStore, StdRandom, SystemClock, TokioScheduler,
};
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use api::AppState;
use config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialise structured logging (RUST_LOG controls verbosity).
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Load optional .env file (ignored if missing).
    let _ = dotenvy::dotenv();

    let config = Config::from_env()?;

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let scheduler = Arc::new(TokioScheduler::new(Handle::current()));

    // ─── State ────────────────────────────────────────────
    let store = PaymentStore::new(
        clock.clone(),
        scheduler,
        Box::new(StdRandom::from_entropy()),
    );
    store.seed(mock_payments(
        &mut StdRandom::from_entropy(),
        clock.now(),
        config.seed_count,
    ));
    let sessions = SessionStore::new(config.admin.clone(), clock.clone());

    // ─── Background ticker ────────────────────────────────
    let shutdown = CancellationToken::new();
    let ticker_task = tokio::spawn(ticker::run(
        store.clone(),
        Box::new(StdRandom::from_entropy()),
        Duration::from_secs(config.tick_interval_secs),
        shutdown.clone(),
    ));

    // ─── REST API ─────────────────────────────────────────
    let state = Arc::new(AppState {
        store,
        sessions,
        started_at: clock.now(),
    });

    let app = api::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr = format!("0.0.0.0:{}", config.api_port);
    info!("API listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let signal = shutdown.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown requested");
            signal.cancel();
        })
        .await?;

    shutdown.cancel();
    ticker_task.await?;

    Ok(())
}
