use perps_pnl::orchestration::{CsvLoader, LiveLoader, PnlLoader};
use perps_pnl::{api, init_db, Config, PnlService, PnlSource, Repository, SqliteDataSource};
use std::net::SocketAddr;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into()),
        )
        .init();

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    // One pool for the process lifetime; closed after the server stops
    let (loader, repo): (Arc<dyn PnlLoader>, Option<Arc<Repository>>) = match &config.pnl_source
    {
        PnlSource::Database { path } => {
            let pool = match init_db(path).await {
                Ok(p) => p,
                Err(e) => {
                    eprintln!("Failed to initialize database: {}", e);
                    std::process::exit(1);
                }
            };
            let repo = Arc::new(Repository::new(pool));
            let datasource = Arc::new(SqliteDataSource::new(repo.clone()));
            let loader: Arc<dyn PnlLoader> = Arc::new(LiveLoader::new(datasource));
            (loader, Some(repo))
        }
        PnlSource::Csv { path } => {
            let loader: Arc<dyn PnlLoader> = Arc::new(CsvLoader::new(path.clone()));
            (loader, None)
        }
    };

    let service = Arc::new(PnlService::new(loader, config.cache_ttl));
    tracing::info!(ttl_secs = service.ttl().as_secs(), "PnL cache configured");

    // Create router
    let app = api::create_router(api::AppState::new(service));

    // Bind to address
    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Failed to bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    tracing::info!("Server listening on {}", addr);

    // Run server
    let result = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    if let Some(repo) = repo {
        repo.close().await;
        tracing::info!("Database pool closed");
    }

    if let Err(e) = result {
        eprintln!("Server error: {}", e);
        std::process::exit(1);
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
