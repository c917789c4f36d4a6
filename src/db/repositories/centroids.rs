use std::collections::BTreeMap;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Row};

use crate::db::{
    helpers::{conversion_error, parse_datetime, room_id_for_beacon},
    models::Centroid,
    Database,
};
use crate::store::CentroidStore;

fn row_to_centroid(row: &Row) -> Result<Centroid, rusqlite::Error> {
    let updated_at_str: String = row.get("updated_at")?;

    Ok(Centroid {
        beacon_id: row.get("beacon_id")?,
        room: row.get("room")?,
        mean_rssi: row.get("mean_rssi")?,
        updated_at: parse_datetime(&updated_at_str, "updated_at").map_err(conversion_error)?,
    })
}

impl CentroidStore for Database {
    async fn upsert(
        &self,
        beacon_id: &str,
        mean_rssi: f64,
        updated_at: DateTime<Utc>,
    ) -> Result<()> {
        let beacon_id = beacon_id.to_string();
        self.execute(move |conn| {
            let room_id = room_id_for_beacon(conn, &beacon_id)?
                .ok_or_else(|| anyhow!("beacon '{beacon_id}' is not bound to a room"))?;

            conn.execute(
                "INSERT INTO centroids (room_id, mean_rssi, updated_at)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT(room_id) DO UPDATE SET
                     mean_rssi = excluded.mean_rssi,
                     updated_at = excluded.updated_at",
                params![room_id, mean_rssi, updated_at.to_rfc3339()],
            )
            .with_context(|| format!("failed to upsert centroid for beacon {beacon_id}"))?;
            Ok(())
        })
        .await
    }

    async fn get_all(&self) -> Result<BTreeMap<String, f64>> {
        self.execute(|conn| {
            let mut stmt = conn.prepare(
                "SELECT r.beacon_id, c.mean_rssi
                 FROM centroids c
                 JOIN rooms r ON r.id = c.room_id",
            )?;

            let centroids = stmt
                .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
                .collect::<Result<BTreeMap<String, f64>, _>>()?;

            Ok(centroids)
        })
        .await
    }

    async fn list_centroids(&self) -> Result<Vec<Centroid>> {
        self.execute(|conn| {
            let mut stmt = conn.prepare(
                "SELECT r.beacon_id AS beacon_id,
                        r.name AS room,
                        c.mean_rssi AS mean_rssi,
                        c.updated_at AS updated_at
                 FROM centroids c
                 JOIN rooms r ON r.id = c.room_id
                 ORDER BY r.beacon_id ASC",
            )?;

            let centroids = stmt
                .query_map([], row_to_centroid)?
                .collect::<Result<Vec<_>, _>>()?;

            Ok(centroids)
        })
        .await
    }
}
