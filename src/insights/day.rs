use chrono::NaiveDate;

use crate::error::ValidationError;

use super::config::InsightsConfig;

pub const SECONDS_PER_DAY: i64 = 86_400;

/// Half-open `[start, end)` Unix-second window for a `YYYY-MM-DD` date.
pub fn day_bounds(date: &str, config: &InsightsConfig) -> Result<(i64, i64), ValidationError> {
    let day = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|_| ValidationError::InvalidDate(date.to_string()))?;
    let midnight = day
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| ValidationError::InvalidDate(date.to_string()))?;

    let start = midnight.and_utc().timestamp() - i64::from(config.utc_offset_secs);
    Ok((start, start + SECONDS_PER_DAY))
}
