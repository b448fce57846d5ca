use tracing::info;
use tracing_subscriber::EnvFilter;

use parentwise_backend::config::AppConfig;
use parentwise_backend::db::DbConnection;
use parentwise_backend::rest::{router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(missing) => {
            eprintln!("{missing}");
            std::process::exit(1);
        }
    };

    info!("Setting up database");
    let db = DbConnection::new(&config.database_url).await?;

    if config.openai.is_none() {
        tracing::warn!("OPENAI_API_KEY not set; AI plan generation will be unavailable");
    }
    let state = AppState::from_config(db, &config)?;
    let app = router(state, config.cors_origin.as_deref());

    info!("Starting server on {}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
