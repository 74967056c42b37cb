use readmore_service::{router, Catalog, Config, OpenLibraryClient};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("readmore_service=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;
    info!(
        "Using catalog {} (timeout {:?}, cache ttl {:?})",
        config.catalog.base_url, config.catalog.timeout, config.cache.ttl
    );

    let catalog: Catalog = Arc::new(OpenLibraryClient::new(&config.catalog, &config.cache)?);
    let app = router(catalog, &config.static_dir);

    let addr = format!("0.0.0.0:{}", config.port);
    info!("ReadMore service starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
