use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use codecrafters_http::config::Config;
use codecrafters_http::router::Router;
use codecrafters_http::server::new_server;
use codecrafters_http::storage::FileStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "codecrafters_http=info,http_server=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::parse();
    tracing::info!(
        directory = %config.directory.display(),
        address = %config.address,
        "configuration loaded"
    );

    let router = Router::new(FileStore::new(config.directory));
    let server = new_server(config.address, router).await?;
    server.serve().await?;

    Ok(())
}
