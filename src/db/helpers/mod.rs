use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

pub fn parse_datetime(value: &str, field: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("failed to parse {field}"))
}

/// Wraps a conversion failure so it can leave a `query_map` row closure.
pub fn conversion_error(err: anyhow::Error) -> rusqlite::Error {
    rusqlite::Error::ToSqlConversionFailure(Box::new(std::io::Error::new(
        std::io::ErrorKind::InvalidData,
        err.to_string(),
    )))
}

pub fn room_id_for_beacon(conn: &Connection, beacon_id: &str) -> Result<Option<i64>> {
    conn.query_row(
        "SELECT id FROM rooms WHERE beacon_id = ?1",
        params![beacon_id],
        |row| row.get(0),
    )
    .optional()
    .context("failed to look up room by beacon")
}

pub fn room_id_for_name(conn: &Connection, name: &str) -> Result<Option<i64>> {
    conn.query_row(
        "SELECT id FROM rooms WHERE name = ?1",
        params![name],
        |row| row.get(0),
    )
    .optional()
    .context("failed to look up room by name")
}
