use crate::db::models::LocationEvent;
use crate::inference::UNKNOWN;

use super::config::DwellConfig;

/// A stable run closed by the tracker. Runs are keyed by beacon, so the room
/// name is resolved only when the dwell is stored and survives renames.
#[derive(Debug, Clone, PartialEq)]
pub struct Dwell {
    pub beacon_id: String,
    pub start_ts: i64,
    pub end_ts: i64,
    pub confidence: f64,
}

impl Dwell {
    pub fn duration_secs(&self) -> i64 {
        self.end_ts.saturating_sub(self.start_ts)
    }

    pub fn into_event(self, room: impl Into<String>) -> LocationEvent {
        LocationEvent::new(room, self.start_ts, self.end_ts, self.confidence)
    }
}

/// Consecutive observations of one beacon.
#[derive(Debug, Clone)]
struct Run {
    beacon_id: String,
    start_ts: i64,
    confidence_sum: f64,
    observations: usize,
}

impl Run {
    fn start(beacon_id: &str, confidence: f64, ts: i64) -> Self {
        Self {
            beacon_id: beacon_id.to_string(),
            start_ts: ts,
            confidence_sum: confidence,
            observations: 1,
        }
    }

    fn extend(&mut self, confidence: f64) {
        self.confidence_sum += confidence;
        self.observations += 1;
    }

    /// Close the run at `end_ts`. Runs shorter than the dwell threshold are
    /// dropped.
    fn finish(self, end_ts: i64, dwell_secs: i64) -> Option<Dwell> {
        if end_ts.saturating_sub(self.start_ts) < dwell_secs {
            return None;
        }
        let confidence = (self.confidence_sum / self.observations as f64).clamp(0.0, 1.0);
        Some(Dwell {
            beacon_id: self.beacon_id,
            start_ts: self.start_ts,
            end_ts,
            confidence,
        })
    }
}

/// Turns a timestamped stream of beacon-level estimates into dwells.
///
/// A run of one beacon ends when a different beacon wins, when an `unknown`
/// or low-confidence estimate arrives, or on [`flush`]. The run is kept only
/// if it lasted at least `dwell_secs`; the dwell ends at the timestamp that
/// closed it. Observations older than the last accepted one are ignored.
///
/// [`flush`]: DwellTracker::flush
#[derive(Debug, Clone)]
pub struct DwellTracker {
    config: DwellConfig,
    current: Option<Run>,
    last_ts: Option<i64>,
}

impl DwellTracker {
    pub fn new(config: DwellConfig) -> Self {
        Self {
            config,
            current: None,
            last_ts: None,
        }
    }

    /// Beacon of the run currently being tracked, if any.
    pub fn current_beacon(&self) -> Option<&str> {
        self.current.as_ref().map(|run| run.beacon_id.as_str())
    }

    pub fn observe(&mut self, beacon_id: &str, confidence: f64, ts: i64) -> Option<Dwell> {
        if self.last_ts.is_some_and(|last| ts < last) {
            return None;
        }
        self.last_ts = Some(ts);

        let usable = beacon_id != UNKNOWN
            && confidence.is_finite()
            && confidence >= self.config.min_confidence;
        if !usable {
            return self.close(ts);
        }

        match &mut self.current {
            Some(run) if run.beacon_id == beacon_id => {
                run.extend(confidence);
                None
            }
            _ => {
                let finished = self.close(ts);
                self.current = Some(Run::start(beacon_id, confidence, ts));
                finished
            }
        }
    }

    /// End the current run at `ts`, e.g. when the stream stops.
    pub fn flush(&mut self, ts: i64) -> Option<Dwell> {
        if self.last_ts.is_some_and(|last| ts < last) {
            return None;
        }
        self.last_ts = Some(ts);
        self.close(ts)
    }

    fn close(&mut self, end_ts: i64) -> Option<Dwell> {
        self.current
            .take()
            .and_then(|run| run.finish(end_ts, self.config.dwell_secs))
    }
}

impl Default for DwellTracker {
    fn default() -> Self {
        Self::new(DwellConfig::default())
    }
}
