use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A move between two different rooms, timestamped at the end of the
/// departing event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub from_room: String,
    pub to_room: String,
    pub timestamp: i64,
}

/// Transitions grouped by room pair, ignoring time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionCount {
    pub from_room: String,
    pub to_room: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub active_hours: f64,
    pub most_visited_room: Option<String>,
    pub most_visited_duration: i64,
}

impl Default for SummaryStats {
    fn default() -> Self {
        Self {
            active_hours: 0.0,
            most_visited_room: None,
            most_visited_duration: 0,
        }
    }
}

/// One day of activity. Durations are in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    pub date: String,
    pub room_durations: BTreeMap<String, i64>,
    pub total_duration: i64,
    pub transitions: Vec<Transition>,
    pub summary: SummaryStats,

    /// Share of `total_duration` per room, rounded to three decimals. Kept for
    /// older dashboard clients; empty when nothing was recorded.
    pub dwell: BTreeMap<String, f64>,

    /// Classification accuracy. Not measured yet, always `None`.
    pub accuracy: Option<f64>,

    /// Free-text note supplied by an external writer, never computed here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insight: Option<String>,
}

impl DailySummary {
    pub fn empty(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            room_durations: BTreeMap::new(),
            total_duration: 0,
            transitions: Vec::new(),
            summary: SummaryStats::default(),
            dwell: BTreeMap::new(),
            accuracy: None,
            insight: None,
        }
    }
}
