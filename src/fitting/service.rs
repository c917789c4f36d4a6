use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;

use crate::db::models::{CalibrationUpload, Room};
use crate::error::CalibrationError;
use crate::store::{CalibrationStore, CentroidStore, RoomDirectory};

use super::centroid::fit;

const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info};

/// Store-backed calibration workflow. Uploads and fits share one async lock,
/// so a fit always reads and writes a coherent set of samples and centroids.
pub struct CalibrationService<S> {
    store: S,
    write_lock: Arc<Mutex<()>>,
}

impl<S: Clone> Clone for CalibrationService<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            write_lock: Arc::clone(&self.write_lock),
        }
    }
}

impl<S> CalibrationService<S>
where
    S: CalibrationStore + CentroidStore + RoomDirectory,
{
    pub fn new(store: S) -> Self {
        Self {
            store,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Bind the upload's room to its beacon and replace every sample stored
    /// for that beacon.
    pub async fn upload(&self, upload: CalibrationUpload) -> Result<Room, CalibrationError> {
        upload.validate()?;

        let _guard = self.write_lock.lock().await;

        let current_room = self.store.room_for_beacon(&upload.beacon_id).await?;
        let room_owner = self.store.beacon_for_room(&upload.room).await?;
        if let (Some(_), Some(owner)) = (&current_room, &room_owner) {
            if owner != &upload.beacon_id {
                return Err(CalibrationError::RoomConflict {
                    room: upload.room.clone(),
                    beacon_id: owner.clone(),
                });
            }
        }

        let room = self.store.bind(&upload.room, &upload.beacon_id).await?;
        self.store
            .overwrite_samples(&upload.beacon_id, vec![upload.window()])
            .await?;

        log_info!(
            "stored {} calibration samples for beacon {} ({})",
            upload.rssi_samples.len(),
            upload.beacon_id,
            room.name
        );

        Ok(room)
    }

    /// Recompute every centroid from the stored samples and persist them.
    pub async fn fit(&self) -> Result<BTreeMap<String, f64>, CalibrationError> {
        let _guard = self.write_lock.lock().await;

        let mut samples_by_beacon = BTreeMap::new();
        for beacon_id in self.store.list_all_beacons_with_samples().await? {
            let samples = self.store.get_samples(&beacon_id).await?;
            samples_by_beacon.insert(beacon_id, samples);
        }

        let centroids = fit(&samples_by_beacon)?;

        let updated_at = Utc::now();
        for (beacon_id, mean_rssi) in &centroids {
            self.store.upsert(beacon_id, *mean_rssi, updated_at).await?;
            log_debug!("centroid for {beacon_id}: {mean_rssi:.2} dBm");
        }

        log_info!("fitted {} centroids", centroids.len());
        Ok(centroids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FitError, ValidationError};
    use crate::store::MemoryStore;

    fn upload(beacon_id: &str, room: &str, samples: &[f64]) -> CalibrationUpload {
        CalibrationUpload {
            beacon_id: beacon_id.into(),
            room: room.into(),
            rssi_samples: samples.to_vec(),
            window_start: 1_700_000_000,
            window_end: 1_700_000_060,
        }
    }

    #[tokio::test]
    async fn fit_without_uploads_reports_no_calibration_data() {
        let service = CalibrationService::new(MemoryStore::new());
        let err = service.fit().await.unwrap_err();
        assert!(matches!(err, CalibrationError::Fit(FitError::NoCalibrationData)));
    }

    #[tokio::test]
    async fn fit_persists_means() {
        let store = MemoryStore::new();
        let service = CalibrationService::new(store.clone());
        service.upload(upload("B1", "Kitchen", &[-60.0, -64.0])).await.unwrap();
        service.upload(upload("B2", "Office", &[-75.0])).await.unwrap();

        let centroids = service.fit().await.unwrap();
        assert_eq!(centroids["B1"], -62.0);
        assert_eq!(centroids["B2"], -75.0);
        assert_eq!(store.get_all().await.unwrap(), centroids);
    }

    #[tokio::test]
    async fn reupload_overwrites_before_next_fit() {
        let service = CalibrationService::new(MemoryStore::new());
        service.upload(upload("B1", "Kitchen", &[-40.0, -40.0])).await.unwrap();
        assert_eq!(service.fit().await.unwrap()["B1"], -40.0);

        service.upload(upload("B1", "Kitchen", &[-90.0])).await.unwrap();
        assert_eq!(service.fit().await.unwrap()["B1"], -90.0);
    }

    #[tokio::test]
    async fn upload_rejects_empty_samples() {
        let service = CalibrationService::new(MemoryStore::new());
        let err = service.upload(upload("B1", "Kitchen", &[])).await.unwrap_err();
        assert!(matches!(
            err,
            CalibrationError::Invalid(ValidationError::EmptySamples)
        ));
    }

    #[tokio::test]
    async fn upload_refuses_to_steal_a_bound_room() {
        let service = CalibrationService::new(MemoryStore::new());
        service.upload(upload("B1", "Kitchen", &[-60.0])).await.unwrap();
        service.upload(upload("B2", "Office", &[-70.0])).await.unwrap();

        let err = service
            .upload(upload("B1", "Office", &[-65.0]))
            .await
            .unwrap_err();
        assert!(matches!(err, CalibrationError::RoomConflict { .. }));
    }

    #[tokio::test]
    async fn concurrent_fits_agree() {
        let service = CalibrationService::new(MemoryStore::new());
        service.upload(upload("B1", "Kitchen", &[-61.0, -63.0])).await.unwrap();

        let (a, b) = tokio::join!(service.fit(), service.fit());
        assert_eq!(a.unwrap(), b.unwrap());
    }
}
