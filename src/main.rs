//! 产品目录服务入口

use std::sync::Arc;

use anyhow::Context;
use product_catalog::app::product::repository::{MemoryProductRepository, ProductRepository};
use product_catalog::app::product::service::ProductService;
use product_catalog::app::session::service::SessionService;
use product_catalog::infrastructure::config::{self, Config, StorageBackend};
use product_catalog::infrastructure::logger::Logger;
use product_catalog::{build_app, AppState};
use tokio::{net::TcpListener, signal};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let source = config::find_config_file();
    let config = config::load_config(source)?;
    let _log_guard = Logger::init(&config.logging)?;

    info!("Starting product catalog server...");
    match source {
        Some(path) => info!("Loaded configuration from {}", path.display()),
        None => info!("No configuration file found, using defaults"),
    }

    let repository = open_repository(&config).await?;
    let product_service = ProductService::new(repository);
    let session_service = SessionService::from_config(&config.auth);
    info!(
        "Storage backend: {}, configured sessions: {}",
        product_service.backend(),
        session_service.len()
    );
    if session_service.is_empty() {
        warn!("No sessions configured, every request to /user will be rejected");
    }

    let state = AppState::new(product_service, session_service);
    let app = build_app(state, &config.http);

    let address = config.http.listen_address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;
    let prefix = config.http.api_prefix.trim_end_matches('/');

    info!("🚀 Product catalog running on http://{}", listener.local_addr()?);
    info!("   GET    {prefix}/products");
    info!("   POST   {prefix}/products");
    info!("   GET    {prefix}/products/:id");
    info!("   PUT    {prefix}/products/:id");
    info!("   PATCH  {prefix}/products/:id");
    info!("   DELETE {prefix}/products/:id");
    info!("   GET    {prefix}/user");
    info!("   GET    /health");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn open_repository(config: &Config) -> anyhow::Result<Arc<dyn ProductRepository>> {
    match config.database.backend {
        StorageBackend::Memory => Ok(Arc::new(MemoryProductRepository::new())),
        #[cfg(feature = "database")]
        StorageBackend::Postgres => {
            use product_catalog::app::product::repository::PgProductRepository;
            use product_catalog::infrastructure::database::DatabaseManager;

            let manager = DatabaseManager::new(&config.database)
                .await
                .context("failed to connect to database")?;
            manager.migrate().await.context("failed to create tables")?;
            Ok(Arc::new(PgProductRepository::new(manager.get_pool().clone())))
        }
        #[cfg(not(feature = "database"))]
        StorageBackend::Postgres => {
            anyhow::bail!("postgres backend requires the `database` feature")
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
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
