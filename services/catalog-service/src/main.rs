use catalog_core::BUILD_INFO;
use catalog_service::{app, ServiceConfig};
use product_store::InMemoryProductStore;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting Catalog Service {}", BUILD_INFO);

    let config = ServiceConfig::from_env();
    let app = app(InMemoryProductStore::new());

    let listener = TcpListener::bind(config.bind_addr.as_str()).await?;
    info!("Catalog Service listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
