//! Error types that callers need to tell apart.
//!
//! Store and I/O failures travel as `anyhow::Error`. They are wrapped in a
//! separate variant wherever a caller must tell them apart from conditions a
//! client can correct.

use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum FitError {
    /// No beacon has any calibration sample to average.
    #[error("No calibration data available. Upload calibration data first.")]
    NoCalibrationData,
}

/// Failures of the store-backed calibration workflow (upload and fit).
#[derive(Error, Debug)]
pub enum CalibrationError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("room '{room}' is already bound to beacon '{beacon_id}'")]
    RoomConflict { room: String, beacon_id: String },

    #[error(transparent)]
    Fit(#[from] FitError),

    #[error("calibration store failure: {0:#}")]
    Store(#[from] anyhow::Error),
}

#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("No RSSI samples provided")]
    EmptySamples,

    #[error("RSSI sample at index {index} is not a finite number")]
    NonFiniteSample { index: usize },

    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },

    #[error("timestamp {0} is outside the supported range")]
    TimestampOutOfRange(i64),

    #[error("end_ts ({end_ts}) is before start_ts ({start_ts})")]
    NegativeDuration { start_ts: i64, end_ts: i64 },

    #[error("confidence {0} is outside [0, 1]")]
    ConfidenceOutOfRange(f64),

    #[error("Invalid date format '{0}'. Use YYYY-MM-DD")]
    InvalidDate(String),
}
