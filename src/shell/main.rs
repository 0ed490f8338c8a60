use std::sync::Arc;
use tracing_subscriber::{EnvFilter, fmt};

use attendance_tracker::modules::attendance::store::DataStore;
use attendance_tracker::shared::infrastructure::document_storage::DocumentStorage;
use attendance_tracker::shared::infrastructure::document_storage::file_system::FileDocumentStorage;
use attendance_tracker::shell::config::Config;
use attendance_tracker::shell::http::router;
use attendance_tracker::shell::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let config = Config::from_env()?;
    let storage: Arc<dyn DocumentStorage> =
        Arc::new(FileDocumentStorage::new(config.data_dir.clone()));
    let store = DataStore::open(storage)?;

    let app = router(AppState::new(store));

    tracing::info!(data_dir = %config.data_dir.display(), "attendance store opened");
    tracing::info!("HTTP endpoint: http://{}", config.listen_addr);
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
