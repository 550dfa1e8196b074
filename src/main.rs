use books_api::{
    auth::blacklist::spawn_sweeper, config::Config, observability, routes::app_router,
    state::AppState,
};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    let cfg = Config::from_env();
    observability::init(&cfg.log_level);

    if cfg.uses_default_secrets() {
        tracing::warn!("JWT_SECRET/JWT_REFRESH_SECRET not set, using development secrets");
    }

    let state = Arc::new(AppState::new(&cfg).expect("init state"));
    let _sweeper = spawn_sweeper(
        state.tokens.revocations().clone(),
        Duration::from_secs(cfg.revocation_sweep_interval_seconds.max(1)),
    );

    let app = app_router(state).layer(CorsLayer::permissive());

    let listener = TcpListener::bind(&cfg.bind_addr)
        .await
        .expect("bind listener");
    tracing::info!(addr = %cfg.bind_addr, "server listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .expect("server error");

    tracing::info!("server stopped");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
