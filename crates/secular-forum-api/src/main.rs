mod routes;
mod state;

use anyhow::Result;
use secular_forum_core::OutlookLoader;
use state::{ApiSettings, AppState};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = ApiSettings::from_env()?;
    let loader = OutlookLoader::new(settings.data.data_file.clone());

    // Rows are still read lazily on the first request if this fails.
    if let Err(err) = loader.load() {
        warn!("outlook data not available at startup: {err}");
    }

    let router = routes::router(AppState::new(loader));

    let listener = TcpListener::bind(settings.bind).await?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, router.into_make_service()).await?;

    Ok(())
}
