mod api;
mod middleware;

use std::path::PathBuf;
use std::sync::Arc;

use campusnav_core::{load_locations, load_map_config, ConfigError};
use campusnav_directions::DirectionsClient;
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, AppState},
    middleware::DirectionsQuota,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = campusnav_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::info!(env = %config.env, bind_addr = %config.bind_addr, "starting campusnav server");

    let (map, directory) = tokio::join!(
        load_document("map configuration", config.config_path.clone(), load_map_config),
        load_document("location list", config.locations_path.clone(), load_locations),
    );

    let directions = DirectionsClient::with_base_url(
        config.maps_api_key.as_deref(),
        config.directions_timeout_secs,
        &config.directions_base_url,
    )?
    .with_retry(
        config.directions_max_retries,
        config.directions_backoff_base_ms,
    );

    let state = AppState {
        map: map.map(Arc::new),
        directory: directory.map(Arc::new),
        directions: Arc::new(directions),
    };
    let app = build_app(
        state,
        DirectionsQuota::per_minute(config.rate_limit_per_minute),
    );

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

/// Reads one configuration document off the async runtime. A failure is
/// logged and disables only the feature that depends on the document.
async fn load_document<T, F>(what: &'static str, path: PathBuf, load: F) -> Option<T>
where
    T: Send + 'static,
    F: FnOnce(&std::path::Path) -> Result<T, ConfigError> + Send + 'static,
{
    let path_text = path.display().to_string();
    match tokio::task::spawn_blocking(move || load(&path)).await {
        Ok(Ok(value)) => {
            tracing::info!(document = what, path = %path_text, "loaded");
            Some(value)
        }
        Ok(Err(e)) => {
            tracing::error!(document = what, path = %path_text, error = %e, "failed to load; feature disabled");
            None
        }
        Err(e) => {
            tracing::error!(document = what, error = %e, "loader task failed; feature disabled");
            None
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
