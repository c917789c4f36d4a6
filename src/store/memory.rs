use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::{anyhow, bail, Result};
use chrono::{DateTime, Utc};

use super::{CalibrationStore, CentroidStore, EventStore, RoomDirectory};
use crate::db::models::{Centroid, LocationEvent, Room, SampleWindow};

#[derive(Default)]
struct MemoryState {
    /// room name -> beacon id
    rooms: BTreeMap<String, String>,
    samples: BTreeMap<String, Vec<SampleWindow>>,
    centroids: BTreeMap<String, (f64, DateTime<Utc>)>,
    events: Vec<LocationEvent>,
    next_event_id: i64,
}

impl MemoryState {
    fn room_for_beacon(&self, beacon_id: &str) -> Option<&str> {
        self.rooms
            .iter()
            .find(|(_, beacon)| beacon.as_str() == beacon_id)
            .map(|(room, _)| room.as_str())
    }
}

/// In-process store with the same semantics as the SQLite database. Every
/// operation runs under one lock, so reads are snapshot-consistent.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>> {
        self.inner
            .lock()
            .map_err(|_| anyhow!("memory store lock poisoned"))
    }
}

impl CalibrationStore for MemoryStore {
    async fn get_samples(&self, beacon_id: &str) -> Result<Vec<f64>> {
        let state = self.lock()?;
        Ok(state
            .samples
            .get(beacon_id)
            .map(|windows| {
                windows
                    .iter()
                    .flat_map(|w| w.rssi_samples.iter().copied())
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn overwrite_samples(&self, beacon_id: &str, windows: Vec<SampleWindow>) -> Result<()> {
        let mut state = self.lock()?;
        if state.room_for_beacon(beacon_id).is_none() {
            bail!("beacon '{beacon_id}' is not bound to a room");
        }
        state.samples.insert(beacon_id.to_string(), windows);
        Ok(())
    }

    async fn list_all_beacons_with_samples(&self) -> Result<Vec<String>> {
        let state = self.lock()?;
        Ok(state
            .samples
            .iter()
            .filter(|(_, windows)| windows.iter().any(|w| !w.rssi_samples.is_empty()))
            .map(|(beacon, _)| beacon.clone())
            .collect())
    }
}

impl CentroidStore for MemoryStore {
    async fn upsert(
        &self,
        beacon_id: &str,
        mean_rssi: f64,
        updated_at: DateTime<Utc>,
    ) -> Result<()> {
        let mut state = self.lock()?;
        if state.room_for_beacon(beacon_id).is_none() {
            bail!("beacon '{beacon_id}' is not bound to a room");
        }
        state
            .centroids
            .insert(beacon_id.to_string(), (mean_rssi, updated_at));
        Ok(())
    }

    async fn get_all(&self) -> Result<BTreeMap<String, f64>> {
        let state = self.lock()?;
        Ok(state
            .centroids
            .iter()
            .map(|(beacon, (mean, _))| (beacon.clone(), *mean))
            .collect())
    }

    async fn list_centroids(&self) -> Result<Vec<Centroid>> {
        let state = self.lock()?;
        let mut centroids = Vec::with_capacity(state.centroids.len());
        for (beacon_id, (mean_rssi, updated_at)) in &state.centroids {
            let room = state
                .room_for_beacon(beacon_id)
                .ok_or_else(|| anyhow!("centroid for unbound beacon '{beacon_id}'"))?;
            centroids.push(Centroid {
                beacon_id: beacon_id.clone(),
                room: room.to_string(),
                mean_rssi: *mean_rssi,
                updated_at: *updated_at,
            });
        }
        Ok(centroids)
    }
}

impl EventStore for MemoryStore {
    async fn append(&self, event: &LocationEvent) -> Result<i64> {
        let mut state = self.lock()?;
        if !state.rooms.contains_key(&event.room) {
            bail!("room '{}' not found", event.room);
        }
        state.next_event_id += 1;
        let id = state.next_event_id;
        let mut stored = event.clone();
        stored.id = Some(id);
        state.events.push(stored);
        Ok(id)
    }

    async fn query_by_date_range(&self, start_ts: i64, end_ts: i64) -> Result<Vec<LocationEvent>> {
        let state = self.lock()?;
        let mut events: Vec<LocationEvent> = state
            .events
            .iter()
            .filter(|e| e.start_ts >= start_ts && e.start_ts < end_ts)
            .cloned()
            .collect();
        events.sort_by_key(|e| e.start_ts);
        Ok(events)
    }
}

impl RoomDirectory for MemoryStore {
    async fn bind(&self, room: &str, beacon_id: &str) -> Result<Room> {
        let mut state = self.lock()?;

        if let Some(current) = state.room_for_beacon(beacon_id).map(str::to_string) {
            if current != room {
                if state.rooms.contains_key(room) {
                    bail!("room '{room}' is already bound to another beacon");
                }
                state.rooms.remove(&current);
                state.rooms.insert(room.to_string(), beacon_id.to_string());
                for event in state.events.iter_mut().filter(|e| e.room == current) {
                    event.room = room.to_string();
                }
            }
        } else if let Some(previous) = state.rooms.insert(room.to_string(), beacon_id.to_string())
        {
            state.samples.remove(&previous);
            state.centroids.remove(&previous);
        }

        Ok(Room {
            id: None,
            name: room.to_string(),
            beacon_id: beacon_id.to_string(),
        })
    }

    async fn room_for_beacon(&self, beacon_id: &str) -> Result<Option<String>> {
        let state = self.lock()?;
        Ok(state.room_for_beacon(beacon_id).map(str::to_string))
    }

    async fn beacon_for_room(&self, room: &str) -> Result<Option<String>> {
        let state = self.lock()?;
        Ok(state.rooms.get(room).cloned())
    }

    async fn list_rooms(&self) -> Result<Vec<Room>> {
        let state = self.lock()?;
        Ok(state
            .rooms
            .iter()
            .map(|(name, beacon_id)| Room {
                id: None,
                name: name.clone(),
                beacon_id: beacon_id.clone(),
            })
            .collect())
    }
}
