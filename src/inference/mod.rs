pub mod classifier;
pub mod config;
pub mod locator;

pub use classifier::{classify, BeaconReading, Classification, UNKNOWN};
pub use config::ClassifierConfig;
pub use locator::{Locator, RoomEstimate};
