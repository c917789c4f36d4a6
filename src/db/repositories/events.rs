use anyhow::{anyhow, Context, Result};
use rusqlite::{params, Row};

use crate::db::{helpers::room_id_for_name, models::LocationEvent, Database};
use crate::store::EventStore;

fn row_to_event(row: &Row) -> Result<LocationEvent, rusqlite::Error> {
    Ok(LocationEvent {
        id: Some(row.get("id")?),
        room: row.get("room")?,
        start_ts: row.get("start_ts")?,
        end_ts: row.get("end_ts")?,
        confidence: row.get("confidence")?,
    })
}

impl EventStore for Database {
    async fn append(&self, event: &LocationEvent) -> Result<i64> {
        let record = event.clone();
        self.execute(move |conn| {
            let room_id = room_id_for_name(conn, &record.room)?
                .ok_or_else(|| anyhow!("room '{}' not found", record.room))?;

            conn.execute(
                "INSERT INTO location_events (room_id, start_ts, end_ts, confidence)
                 VALUES (?1, ?2, ?3, ?4)",
                params![room_id, record.start_ts, record.end_ts, record.confidence],
            )
            .context("failed to insert location event")?;

            Ok(conn.last_insert_rowid())
        })
        .await
    }

    async fn query_by_date_range(&self, start_ts: i64, end_ts: i64) -> Result<Vec<LocationEvent>> {
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT
                    e.id AS id,
                    r.name AS room,
                    e.start_ts AS start_ts,
                    e.end_ts AS end_ts,
                    e.confidence AS confidence
                FROM location_events e
                JOIN rooms r ON r.id = e.room_id
                WHERE e.start_ts >= ?1 AND e.start_ts < ?2
                ORDER BY e.start_ts ASC, e.id ASC",
            )?;

            let events = stmt
                .query_map(params![start_ts, end_ts], row_to_event)?
                .collect::<Result<Vec<_>, _>>()?;

            Ok(events)
        })
        .await
    }
}
