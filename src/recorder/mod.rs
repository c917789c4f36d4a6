pub mod config;
pub mod tracker;

pub use config::DwellConfig;
pub use tracker::{Dwell, DwellTracker};
