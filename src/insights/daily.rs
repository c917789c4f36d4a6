use std::collections::BTreeMap;

use crate::db::models::LocationEvent;

use super::types::{DailySummary, SummaryStats, Transition};

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Aggregate one day's events into durations, transitions and summary stats.
///
/// The caller supplies the events already filtered to the day. Event order
/// does not matter; transitions are read off a stable sort by start time.
/// An empty slice yields [`DailySummary::empty`].
pub fn summarize_day(events: &[LocationEvent], date: &str) -> DailySummary {
    if events.is_empty() {
        return DailySummary::empty(date);
    }

    let mut room_durations: BTreeMap<String, i64> = BTreeMap::new();
    let mut total_duration: i64 = 0;
    for event in events {
        let duration = event.duration_secs();
        debug_assert!(
            duration >= 0,
            "event in '{}' ends before it starts ({} < {})",
            event.room,
            event.end_ts,
            event.start_ts
        );
        let room_total = room_durations.entry(event.room.clone()).or_default();
        *room_total = room_total.saturating_add(duration);
        total_duration = total_duration.saturating_add(duration);
    }

    let dwell = if total_duration > 0 {
        room_durations
            .iter()
            .map(|(room, secs)| (room.clone(), round_to(*secs as f64 / total_duration as f64, 3)))
            .collect()
    } else {
        BTreeMap::new()
    };

    let (most_visited_room, most_visited_duration) = most_visited(&room_durations);

    DailySummary {
        date: date.to_string(),
        transitions: transitions(events),
        summary: SummaryStats {
            active_hours: round_to(total_duration as f64 / SECONDS_PER_HOUR, 2),
            most_visited_room,
            most_visited_duration,
        },
        room_durations,
        total_duration,
        dwell,
        accuracy: None,
        insight: None,
    }
}

fn transitions(events: &[LocationEvent]) -> Vec<Transition> {
    let mut ordered: Vec<&LocationEvent> = events.iter().collect();
    ordered.sort_by_key(|event| event.start_ts);

    ordered
        .windows(2)
        .filter(|pair| pair[0].room != pair[1].room)
        .map(|pair| Transition {
            from_room: pair[0].room.clone(),
            to_room: pair[1].room.clone(),
            timestamp: pair[0].end_ts,
        })
        .collect()
}

/// Longest room, ties broken by room name. Rooms with zero time never win.
fn most_visited(room_durations: &BTreeMap<String, i64>) -> (Option<String>, i64) {
    let mut best: Option<(&String, i64)> = None;
    for (room, &duration) in room_durations {
        if duration > best.map_or(0, |(_, d)| d) {
            best = Some((room, duration));
        }
    }
    match best {
        Some((room, duration)) => (Some(room.clone()), duration),
        None => (None, 0),
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
