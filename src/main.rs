use std::net::SocketAddr;

use gamedb::config::AppConfig;
use gamedb::database::manager;
use gamedb::handlers;
use gamedb::state::AppState;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = AppConfig::from_env();
    tracing::info!("Starting Game DB in {:?} mode", config.environment);

    let pool = manager::connect(&config.database)
        .await
        .unwrap_or_else(|e| panic!("failed to connect catalogue database: {}", e));

    let state = AppState::new(config, pool);
    state.limiter.spawn_sweeper();

    let app = handlers::router(state);

    // Allow tests or deployments to override port via env
    let port = std::env::var("GAMEDB_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("Game DB listening on http://{}", bind_addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("server");
}
