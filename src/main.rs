use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use cellarium::error::{CellariumError, Result};
use cellarium::interface::QueryInterface;
use cellarium::record::Cellar;
use cellarium::server;
use cellarium::settings::Settings;
use cellarium::source::JsonFileSource;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    if let Err(e) = run().await {
        error!(error = %e, "fatal");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let settings = Settings::load()?;
    let cellar = Arc::new(Cellar::new());
    let source = JsonFileSource::new(&settings.source.rows_path);
    let interface = Arc::new(QueryInterface::new(Arc::clone(&cellar), Box::new(source)));

    let count = interface.refresh()?;
    info!(wines = count, path = %settings.source.rows_path, "initial load complete");

    let app = server::router(Arc::clone(&interface));
    let address = format!("{}:{}", settings.server.address, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .map_err(|e| CellariumError::Server(format!("{address}: {e}")))?;
    info!(%address, "serving");
    axum::serve(listener, app)
        .await
        .map_err(|e| CellariumError::Server(e.to_string()))
}
