// YaMDb API Server

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use yamdb_api::{api::create_router, app_state::AppState, config::Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = Config::from_env()?;
    let addr = config.server_address();

    // Initialize application state
    let app_state = AppState::new(config).await?;
    let app = create_router(app_state);

    let listener = TcpListener::bind(&addr).await?;
    info!("YaMDb API listening on http://{}", addr);
    info!("  POST   /api/v1/auth/signup                 - Register and receive a confirmation code");
    info!("  POST   /api/v1/auth/token                  - Exchange the code for an access token");
    info!("  GET    /api/v1/titles                      - Browse titles");
    info!("  GET    /health                             - Liveness probe");

    axum::serve(listener, app).await?;

    Ok(())
}
