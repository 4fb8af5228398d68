mod config;
mod constants;
mod error;
mod handlers;
mod middleware;
mod models;
mod routes;
mod services;
mod state;
#[cfg(test)]
mod tests;
mod utils;

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Backend, Settings};
use crate::models::create_pool;
use crate::routes::create_app;
use crate::services::{
    mailer_from_settings, DesignService, DesignStore, FileService, MemoryDesignStore,
    MySqlDesignStore,
};
use crate::state::AppState;
use crate::utils::shutdown_signal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "design_service=debug,tower_http=debug,axum::rejection=trace".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let settings = Settings::new().unwrap_or_else(|e| {
        tracing::warn!("Failed to load configuration ({}), using defaults", e);
        Settings::default()
    });

    tracing::info!("Starting design service...");
    tracing::info!("Configuration: {:?}", settings);

    let store: Arc<dyn DesignStore> = match settings.database.backend() {
        Backend::MySql => {
            let pool =
                create_pool(&settings.database.url, settings.database.max_connections).await?;
            tracing::info!("Database connection pool created");
            Arc::new(MySqlDesignStore::new(pool))
        }
        Backend::Memory => {
            tracing::warn!("Using in-memory design store, data is lost on restart");
            Arc::new(MemoryDesignStore::new())
        }
    };

    let file_service = Arc::new(FileService::new(&settings.storage));
    tracing::info!("Uploads stored under {}", file_service.root().display());

    let mailer = mailer_from_settings(settings.email.as_ref())?;

    let design_service = Arc::new(DesignService::new(store, file_service.clone(), mailer));
    let app_state = AppState::new(
        design_service,
        file_service,
        settings.storage.max_upload_bytes,
    );

    let app = create_app(app_state);

    let addr = settings.bind_address();
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}
