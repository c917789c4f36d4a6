pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod fitting;
pub mod inference;
pub mod insights;
pub mod recorder;
pub mod store;
pub mod utils;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;

use config::Settings;
use db::Database;
use fitting::CalibrationService;
use inference::Locator;
use recorder::DwellTracker;

/// Shared state handed to every HTTP handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub settings: Arc<Settings>,
    pub calibration: CalibrationService<Database>,
    pub locator: Locator<Database>,
    pub tracker: Arc<Mutex<DwellTracker>>,
}

impl AppState {
    pub fn new(db: Database, settings: Settings) -> Self {
        Self {
            calibration: CalibrationService::new(db.clone()),
            locator: Locator::new(db.clone(), settings.classifier.clone()),
            tracker: Arc::new(Mutex::new(DwellTracker::new(settings.dwell.clone()))),
            settings: Arc::new(settings),
            db,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    Router::new()
        .route("/rooms", get(api::list_rooms))
        .route("/calibration/upload", post(api::upload_calibration))
        .route("/calibration/fit", post(api::fit_centroids))
        .route("/centroids", get(api::list_centroids))
        .route("/infer", post(api::infer_room))
        .route("/infer/track", post(api::track_room))
        .route("/events/location", post(api::create_location_event))
        .route("/insights/daily", get(api::daily_summary))
        .route("/insights/daily/transitions", get(api::daily_transitions))
        .merge(api::health_routes())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Service entry point. The optional first argument is a JSON settings file.
pub fn run() -> Result<()> {
    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!("HomeSense starting up...");

    let settings_path = std::env::args_os().nth(1).map(PathBuf::from);
    let settings = Settings::load(settings_path.as_deref())?;

    let runtime = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
    runtime.block_on(serve(settings))
}

async fn serve(settings: Settings) -> Result<()> {
    let database = Database::new(settings.db_path.clone())?;
    let bind_addr = settings.bind_addr.clone();

    let app = build_router(AppState::new(database, settings));

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    log::info!("Listening on http://{bind_addr}");

    axum::serve(listener, app)
        .await
        .context("HTTP server terminated")?;

    Ok(())
}
