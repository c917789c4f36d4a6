//! Location event data model.
//!
//! A confirmed dwell interval in one room. Events are immutable once stored.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Latest accepted Unix timestamp, 9999-12-31T23:59:59Z.
pub const MAX_TIMESTAMP: i64 = 253_402_300_799;

/// Timestamps must lie in `[0, MAX_TIMESTAMP]`, which keeps every duration and
/// every sum of a day's durations far from `i64` overflow.
pub fn validate_timestamp(ts: i64) -> Result<(), ValidationError> {
    if (0..=MAX_TIMESTAMP).contains(&ts) {
        Ok(())
    } else {
        Err(ValidationError::TimestampOutOfRange(ts))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub room: String,
    pub start_ts: i64,
    pub end_ts: i64,
    pub confidence: f64,
}

impl LocationEvent {
    pub fn new(room: impl Into<String>, start_ts: i64, end_ts: i64, confidence: f64) -> Self {
        Self {
            id: None,
            room: room.into(),
            start_ts,
            end_ts,
            confidence,
        }
    }

    pub fn duration_secs(&self) -> i64 {
        self.end_ts.saturating_sub(self.start_ts)
    }

    /// Checks applied before an event is accepted for storage.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.room.trim().is_empty() {
            return Err(ValidationError::EmptyField { field: "room" });
        }
        validate_timestamp(self.start_ts)?;
        validate_timestamp(self.end_ts)?;
        if self.end_ts < self.start_ts {
            return Err(ValidationError::NegativeDuration {
                start_ts: self.start_ts,
                end_ts: self.end_ts,
            });
        }
        if !(0.0..=1.0).contains(&self.confidence) {
            return Err(ValidationError::ConfidenceOutOfRange(self.confidence));
        }
        Ok(())
    }
}
