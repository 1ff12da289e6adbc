//! Atrium API Server
//!
//! Main entry point for the Atrium backend service.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use atrium_api::{AppState, RouterOptions, create_router};
use atrium_core::auth::Argon2Hasher;
use atrium_core::avatar::{AvatarService, PhotoPathBuilder};
use atrium_core::storage::{StorageConfig, StorageProvider, StorageService};
use atrium_core::user::{UserService, UserServiceOptions};
use atrium_db::{AvatarRepository, UserRepository, connect};
use atrium_shared::{AppConfig, EmailService, LogFormat};

/// Headroom for multipart framing and text fields on top of the file limit.
const FORM_OVERHEAD_BYTES: usize = 1024 * 1024;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    init_tracing(config.logging.format);

    // Connect to database
    let db = connect(&config.database).await?;
    info!("Connected to database");

    // Avatar storage
    tokio::fs::create_dir_all(&config.storage.root)
        .await
        .with_context(|| format!("Failed to create {}", config.storage.root.display()))?;
    let storage = StorageService::from_config(
        StorageConfig::new(StorageProvider::local_fs(&config.storage.root))
            .with_max_file_size(config.storage.max_file_size),
    )?;
    info!(
        provider = storage.provider_name(),
        root = %config.storage.root.display(),
        max_file_size = config.storage.max_file_size,
        "Storage configured"
    );

    // Create email service
    let email_service = EmailService::new(config.email.clone());
    info!(
        smtp_host = %config.email.smtp_host,
        smtp_port = %config.email.smtp_port,
        "Email service configured"
    );

    let avatars = AvatarService::new(
        Arc::new(storage),
        Arc::new(AvatarRepository::new(db.clone())),
        PhotoPathBuilder::new(&config.storage.root),
    );
    let users = UserService::new(
        Arc::new(UserRepository::new(db)),
        avatars,
        Arc::new(email_service),
        Arc::new(Argon2Hasher),
        UserServiceOptions {
            send_welcome: config.notifications.send_welcome,
        },
    );

    // Create application state
    let state = AppState {
        users: Arc::new(users),
    };

    // Create router
    let body_limit = usize::try_from(config.storage.max_file_size)
        .unwrap_or(usize::MAX)
        .saturating_add(FORM_OVERHEAD_BYTES);
    let app = create_router(
        state,
        RouterOptions {
            request_timeout: Duration::from_secs(config.server.request_timeout_secs),
            body_limit,
        },
    );

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "atrium=debug,tower_http=debug".into());

    let (pretty, json) = match format {
        LogFormat::Pretty => (Some(fmt::layer()), None),
        LogFormat::Json => (None, Some(fmt::layer().json())),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(pretty)
        .with(json)
        .init();
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
