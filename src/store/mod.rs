//! Read/write contracts the fitter, locator and aggregator depend on.
//!
//! `Database` is the production implementation; `MemoryStore` keeps the same
//! semantics in process memory.

#![allow(async_fn_in_trait)]

mod memory;

pub use memory::MemoryStore;

use std::collections::BTreeMap;

use anyhow::Result;
use chrono::{DateTime, Utc};

use crate::db::models::{Centroid, LocationEvent, Room, SampleWindow};

pub trait CalibrationStore {
    /// All samples stored for a beacon, flattened across windows.
    async fn get_samples(&self, beacon_id: &str) -> Result<Vec<f64>>;

    /// Replace every stored window for the beacon with `windows`.
    async fn overwrite_samples(&self, beacon_id: &str, windows: Vec<SampleWindow>) -> Result<()>;

    async fn list_all_beacons_with_samples(&self) -> Result<Vec<String>>;
}

pub trait CentroidStore {
    /// Insert or replace the centroid for a beacon. The beacon must be bound
    /// to a room.
    async fn upsert(&self, beacon_id: &str, mean_rssi: f64, updated_at: DateTime<Utc>)
        -> Result<()>;

    /// One coherent snapshot of `beacon_id -> mean_rssi`.
    async fn get_all(&self) -> Result<BTreeMap<String, f64>>;

    async fn list_centroids(&self) -> Result<Vec<Centroid>>;
}

pub trait EventStore {
    /// Store an event for an existing room and return its id.
    async fn append(&self, event: &LocationEvent) -> Result<i64>;

    /// Events with `start_ts <= event.start_ts < end_ts`, ascending by start.
    async fn query_by_date_range(&self, start_ts: i64, end_ts: i64) -> Result<Vec<LocationEvent>>;
}

/// Bijective `room <-> beacon` lookups.
pub trait RoomDirectory {
    /// Bind `room` to `beacon_id`. A known beacon keeps its room and takes the
    /// new name; a known room name moves to the new beacon and drops the
    /// samples and centroid recorded for its previous beacon.
    async fn bind(&self, room: &str, beacon_id: &str) -> Result<Room>;

    async fn room_for_beacon(&self, beacon_id: &str) -> Result<Option<String>>;

    async fn beacon_for_room(&self, room: &str) -> Result<Option<String>>;

    async fn list_rooms(&self) -> Result<Vec<Room>>;
}
