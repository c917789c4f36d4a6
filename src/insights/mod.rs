//! Daily activity analytics over stored location events.

pub mod config;
pub mod daily;
pub mod day;
pub mod transitions;
pub mod types;

pub use config::InsightsConfig;
pub use daily::summarize_day;
pub use day::day_bounds;
pub use transitions::count_transitions;
pub use types::{DailySummary, SummaryStats, Transition, TransitionCount};
