//! HTTP API handlers

pub mod calibration;
pub mod centroids;
pub mod error;
pub mod events;
pub mod health;
pub mod infer;
pub mod insights;
pub mod rooms;

pub use calibration::{fit_centroids, upload_calibration};
pub use centroids::list_centroids;
pub use error::ApiError;
pub use events::create_location_event;
pub use health::health_routes;
pub use infer::{infer_room, track_room};
pub use insights::{daily_summary, daily_transitions};
pub use rooms::list_rooms;
