pub mod error;
pub mod routes;
pub mod scheduler;
pub mod state;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use rota_core::config::Config;
use rota_core::{Rotator, Store};
use tower_http::trace::TraceLayer;

use crate::scheduler::WeeklyTrigger;
use crate::state::AppState;

/// Build the axum Router with all API routes and middleware.
/// Used by `serve()` and available for integration testing.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/schedule", get(routes::schedule::get_schedule))
        .route("/students", post(routes::roster::replace_students))
        .route("/areas", post(routes::roster::replace_areas))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Open the store and run the startup rotation check.
///
/// A failed startup rotation (storage error, wrong roster size) is returned
/// to the caller and should stop the process.
pub async fn start(config: &Config) -> anyhow::Result<Arc<Rotator>> {
    let clock = config.clock()?;
    let path = config.database.clone();
    let rotator = tokio::task::spawn_blocking(move || -> rota_core::Result<Rotator> {
        let store = Arc::new(Store::open(&path)?);
        let rotator = Rotator::new(store, clock);
        match rotator.on_startup()? {
            Some(rotation) => tracing::info!(stamp = %rotation.stamp, "startup rotation applied"),
            None => tracing::info!("startup check: current assignments kept"),
        }
        Ok(rotator)
    })
    .await??;
    Ok(Arc::new(rotator))
}

/// Start the rotation server on the configured port.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    serve_on(config, listener).await
}

/// Start the rotation server on a pre-bound listener.
///
/// Unlike `serve`, this accepts a `TcpListener` that was already bound so the
/// caller can read the actual port before starting.
pub async fn serve_on(config: Config, listener: tokio::net::TcpListener) -> anyhow::Result<()> {
    let trigger = WeeklyTrigger::new(&config.schedule, &config.timezone)?;
    let rotator = start(&config).await?;
    let trigger_task = trigger.spawn(rotator.clone());

    let app = build_router(AppState::new(rotator));
    let actual_port = listener.local_addr()?.port();
    tracing::info!("rota server listening on http://localhost:{actual_port}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    trigger_task.abort();
    tracing::info!("rota server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
