//! Calibration data models.
//!
//! A calibration upload carries raw RSSI samples for one beacon captured over
//! one time window. Uploading for a beacon replaces everything stored for it.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Raw samples captured in a single window, timestamps in Unix seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleWindow {
    pub window_start: i64,
    pub window_end: i64,
    pub rssi_samples: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalibrationUpload {
    pub beacon_id: String,
    pub room: String,
    pub rssi_samples: Vec<f64>,
    pub window_start: i64,
    pub window_end: i64,
}

impl CalibrationUpload {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.beacon_id.trim().is_empty() {
            return Err(ValidationError::EmptyField { field: "beacon_id" });
        }
        if self.room.trim().is_empty() {
            return Err(ValidationError::EmptyField { field: "room" });
        }
        if self.rssi_samples.is_empty() {
            return Err(ValidationError::EmptySamples);
        }
        if let Some(index) = self.rssi_samples.iter().position(|s| !s.is_finite()) {
            return Err(ValidationError::NonFiniteSample { index });
        }
        Ok(())
    }

    pub fn window(&self) -> SampleWindow {
        SampleWindow {
            window_start: self.window_start,
            window_end: self.window_end,
            rssi_samples: self.rssi_samples.clone(),
        }
    }
}
