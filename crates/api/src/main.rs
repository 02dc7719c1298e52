use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use yamdb_api::config::ServerConfig;
use yamdb_api::router::build_app_router;
use yamdb_api::state::AppState;
use yamdb_db::DbPool;
use yamdb_mail::EmailConfig;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ServerConfig::from_env();
    let pool = prepare_database(&config).await;
    let mailer =
        yamdb_mail::build_mailer(EmailConfig::from_env()).expect("Failed to configure mailer");

    let state = AppState {
        pool: pool.clone(),
        config: Arc::new(config.clone()),
        mailer,
    };
    let app = build_app_router(state, &config);

    let host = config.host.parse().expect("HOST must be an IP address");
    let addr = SocketAddr::new(host, config.port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .unwrap_or_else(|e| panic!("Failed to bind {addr}: {e}"));
    tracing::info!(%addr, "YaMDb API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    pool.close().await;
    tracing::info!("Shutdown complete");
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "yamdb_api=debug,yamdb_mail=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Connect, verify the connection and bring the schema up to date.
async fn prepare_database(config: &ServerConfig) -> DbPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = yamdb_db::create_pool(&url, config.db_max_connections)
        .await
        .expect("Failed to connect to database");
    yamdb_db::health_check(&pool)
        .await
        .expect("Database is not answering");
    yamdb_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    tracing::info!(max_connections = config.db_max_connections, "Database ready");
    pool
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let signal = tokio::select! {
        () = ctrl_c => "SIGINT",
        () = terminate => "SIGTERM",
    };
    tracing::info!(signal, "Shutting down");
}
