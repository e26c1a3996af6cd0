use sea_orm::Database;
use tracing::info;

use grading_api::config::ApiConfig;
use grading_api::infra::storage::FsObjectStore;
use grading_api::router::build_router;
use grading_api::state::AppState;

#[tokio::main]
async fn main() {
    grading_core::tracing::init_tracing();

    let config = ApiConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    std::fs::create_dir_all(&config.storage_root).expect("failed to create storage root");

    let state = AppState {
        db,
        jwt_secret: config.jwt_secret,
        cookie_domain: config.cookie_domain,
        public_base_url: config.public_base_url,
        store: FsObjectStore::new(config.storage_root.as_str()),
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.api_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("api service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
