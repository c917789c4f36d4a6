use anyhow::{anyhow, Context, Result};
use rusqlite::params;
use serde_json::{from_str, to_string};

use crate::db::{
    helpers::{conversion_error, room_id_for_beacon},
    models::SampleWindow,
    Database,
};
use crate::store::CalibrationStore;

impl CalibrationStore for Database {
    async fn get_samples(&self, beacon_id: &str) -> Result<Vec<f64>> {
        let beacon_id = beacon_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT rssi_samples
                 FROM calibration_windows
                 WHERE beacon_id = ?1
                 ORDER BY window_start ASC, id ASC",
            )?;

            let windows_iter = stmt.query_map(params![beacon_id], |row| {
                let samples_json: String = row.get(0)?;
                from_str::<Vec<f64>>(&samples_json)
                    .map_err(|e| conversion_error(anyhow!("invalid rssi_samples: {e}")))
            })?;

            let mut samples = Vec::new();
            for window in windows_iter {
                samples.extend(window?);
            }

            Ok(samples)
        })
        .await
    }

    async fn overwrite_samples(&self, beacon_id: &str, windows: Vec<SampleWindow>) -> Result<()> {
        let beacon_id = beacon_id.to_string();
        self.execute(move |conn| {
            let tx = conn.transaction()?;

            let room_id = room_id_for_beacon(&tx, &beacon_id)?
                .ok_or_else(|| anyhow!("beacon '{beacon_id}' is not bound to a room"))?;

            tx.execute(
                "DELETE FROM calibration_windows WHERE beacon_id = ?1",
                params![beacon_id],
            )
            .context("failed to clear calibration windows")?;

            for window in &windows {
                let samples_json = to_string(&window.rssi_samples)
                    .context("failed to serialize rssi samples")?;
                tx.execute(
                    "INSERT INTO calibration_windows (
                        room_id,
                        beacon_id,
                        window_start,
                        window_end,
                        rssi_samples
                    ) VALUES (?1, ?2, ?3, ?4, ?5)",
                    params![
                        room_id,
                        beacon_id,
                        window.window_start,
                        window.window_end,
                        samples_json,
                    ],
                )
                .context("failed to insert calibration window")?;
            }

            tx.commit()?;
            Ok(())
        })
        .await
    }

    async fn list_all_beacons_with_samples(&self) -> Result<Vec<String>> {
        self.execute(|conn| {
            let mut stmt = conn.prepare(
                "SELECT DISTINCT beacon_id
                 FROM calibration_windows
                 WHERE rssi_samples != '[]'
                 ORDER BY beacon_id ASC",
            )?;

            let beacons = stmt
                .query_map([], |row| row.get(0))?
                .collect::<Result<Vec<String>, _>>()?;

            Ok(beacons)
        })
        .await
    }
}
