use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use dotenvy::dotenv;
use log::{error, info};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use calmserver::api_router::configure_api_routes;
use calmserver::config::AppConfig;
use calmserver::payments::gateway::HmacGatewayVerifier;
use calmserver::shared::state::AppState;
use calmserver::shared::utils::create_conn;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

#[tokio::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .write_style(env_logger::WriteStyle::Always)
        .init();

    let config = AppConfig::from_env().map_err(|e| {
        error!("Configuration error: {e}");
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    let pool = create_conn(&config.database_url()).map_err(|e| {
        error!("Failed to create database pool: {e}");
        std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
    })?;

    {
        let mut conn = pool.get().map_err(|e| {
            error!("Failed to get database connection: {e}");
            std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
        })?;
        conn.run_pending_migrations(MIGRATIONS).map_err(|e| {
            error!("Migration failure: {e}");
            std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
        })?;
    }

    let gateway = Arc::new(HmacGatewayVerifier::new(
        config.gateway.webhook_secret.clone(),
    ));

    let state = Arc::new(AppState {
        conn: pool,
        config: config.clone(),
        gateway,
    });

    let app = configure_api_routes()
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidInput, format!("Bad bind address: {e}"))
        })?;

    info!("calmserver listening on {addr}");

    axum_server::bind(addr)
        .serve(app.into_make_service())
        .await
}
