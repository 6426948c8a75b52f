use report_log::config::{Config, CONFIG_FILE};
use report_log::storage::{ReportStore, DEFAULT_STORE_FILE};
use report_log::{build_router, AppState};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::load(CONFIG_FILE).expect("Failed to load configuration");
    let port = config.port;

    let state = Arc::new(AppState {
        store: ReportStore::new(DEFAULT_STORE_FILE),
        credentials: config.credentials,
    });

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .expect("Failed to bind listen port");

    println!("🚀 Report log running on http://localhost:{}", port);
    println!("📋 Endpoints:");
    println!("   POST /login              - Authenticate");
    println!("   POST /api/reports        - Submit a report");
    println!("   GET  /api/reports        - List reports");
    println!("   GET  /api/reports/:id    - Fetch one report");
    println!("   GET  /api/reports-count  - Count reports");

    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
