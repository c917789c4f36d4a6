use anyhow::{bail, Context, Result};
use rusqlite::{params, OptionalExtension, Row};

use crate::db::{models::Room, Database};
use crate::store::RoomDirectory;

fn row_to_room(row: &Row) -> Result<Room, rusqlite::Error> {
    Ok(Room {
        id: Some(row.get("id")?),
        name: row.get("name")?,
        beacon_id: row.get("beacon_id")?,
    })
}

impl RoomDirectory for Database {
    async fn bind(&self, room: &str, beacon_id: &str) -> Result<Room> {
        let room = room.to_string();
        let beacon_id = beacon_id.to_string();
        self.execute(move |conn| {
            let tx = conn.transaction()?;

            let by_beacon: Option<(i64, String)> = tx
                .query_row(
                    "SELECT id, name FROM rooms WHERE beacon_id = ?1",
                    params![beacon_id],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )
                .optional()?;
            let by_name: Option<i64> = tx
                .query_row(
                    "SELECT id FROM rooms WHERE name = ?1",
                    params![room],
                    |row| row.get(0),
                )
                .optional()?;

            let room_id = match (by_beacon, by_name) {
                (Some((id, name)), _) if name == room => id,
                (Some(_), Some(_)) => {
                    bail!("room '{room}' is already bound to another beacon")
                }
                (Some((id, _)), None) => {
                    tx.execute(
                        "UPDATE rooms SET name = ?1 WHERE id = ?2",
                        params![room, id],
                    )
                    .context("failed to rename room")?;
                    id
                }
                (None, Some(id)) => {
                    // The previous beacon no longer maps to any room.
                    tx.execute(
                        "DELETE FROM calibration_windows WHERE room_id = ?1",
                        params![id],
                    )?;
                    tx.execute("DELETE FROM centroids WHERE room_id = ?1", params![id])?;
                    tx.execute(
                        "UPDATE rooms SET beacon_id = ?1 WHERE id = ?2",
                        params![beacon_id, id],
                    )
                    .context("failed to rebind room beacon")?;
                    id
                }
                (None, None) => {
                    tx.execute(
                        "INSERT INTO rooms (name, beacon_id) VALUES (?1, ?2)",
                        params![room, beacon_id],
                    )
                    .context("failed to insert room")?;
                    tx.last_insert_rowid()
                }
            };

            tx.commit()?;

            Ok(Room {
                id: Some(room_id),
                name: room,
                beacon_id,
            })
        })
        .await
    }

    async fn room_for_beacon(&self, beacon_id: &str) -> Result<Option<String>> {
        let beacon_id = beacon_id.to_string();
        self.execute(move |conn| {
            let name = conn
                .query_row(
                    "SELECT name FROM rooms WHERE beacon_id = ?1",
                    params![beacon_id],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(name)
        })
        .await
    }

    async fn beacon_for_room(&self, room: &str) -> Result<Option<String>> {
        let room = room.to_string();
        self.execute(move |conn| {
            let beacon = conn
                .query_row(
                    "SELECT beacon_id FROM rooms WHERE name = ?1",
                    params![room],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(beacon)
        })
        .await
    }

    async fn list_rooms(&self) -> Result<Vec<Room>> {
        self.execute(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, name, beacon_id
                 FROM rooms
                 ORDER BY name ASC",
            )?;

            let rooms = stmt
                .query_map([], row_to_room)?
                .collect::<Result<Vec<_>, _>>()?;

            Ok(rooms)
        })
        .await
    }
}
