pub mod centroid;
pub mod service;

pub use centroid::fit;
pub use service::CalibrationService;
