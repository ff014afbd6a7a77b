mod api;
mod middleware;

use std::sync::Arc;

use padeldb_core::{CatalogNormalizer, PriceResolver};
use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState, PageSizes};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = padeldb_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::info!(config = ?config, "starting padeldb-server");

    let pool_config = padeldb_db::PoolConfig::from_app_config(&config);
    let pool = padeldb_db::connect_pool(&config.database_url, pool_config).await?;
    padeldb_db::run_migrations(&pool).await?;

    let normalizer = CatalogNormalizer::new(PriceResolver::new(config.retail_sources.clone()));
    let app = build_app(AppState {
        pool,
        normalizer: Arc::new(normalizer),
        page_sizes: PageSizes {
            default: config.default_page_size,
            max: config.max_page_size,
        },
    });

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
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
