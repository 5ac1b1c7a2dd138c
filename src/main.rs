//! Footwear store back-office API server

use anyhow::Result;
use shoe_admin_api::api::{self, AppState};
use shoe_admin_api::config::Config;
use shoe_admin_api::infrastructure::{self, Stores};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let stores = match &config.database_url {
        Some(url) => Stores::postgres(infrastructure::connect(url, config.max_connections).await?),
        None => {
            tracing::warn!("DATABASE_URL not set, using the in-memory store");
            Stores::in_memory()
        }
    };

    let state = AppState::new(stores, config.recent_orders_limit);
    let app = api::router(state).layer(api::cors(config.client_origin.clone()));

    let addr = config.socket_addr();
    tracing::info!(%addr, "shoe-admin-api listening");
    axum::serve(tokio::net::TcpListener::bind(addr).await?, app).await?;
    Ok(())
}
