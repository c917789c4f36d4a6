pub mod calibration;
pub mod centroid;
pub mod location_event;
pub mod room;

pub use calibration::{CalibrationUpload, SampleWindow};
pub use centroid::Centroid;
pub use location_event::{validate_timestamp, LocationEvent, MAX_TIMESTAMP};
pub use room::Room;
