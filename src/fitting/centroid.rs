use std::collections::BTreeMap;

use crate::error::FitError;

/// Mean signal strength per beacon.
///
/// Each beacon's centroid is the flat arithmetic mean of every sample it has.
/// Beacons with no samples get no entry. If no beacon has a single sample the
/// fit fails with [`FitError::NoCalibrationData`].
pub fn fit<'a, I>(samples_by_beacon: I) -> Result<BTreeMap<String, f64>, FitError>
where
    I: IntoIterator<Item = (&'a String, &'a Vec<f64>)>,
{
    let centroids: BTreeMap<String, f64> = samples_by_beacon
        .into_iter()
        .filter(|(_, samples)| !samples.is_empty())
        .map(|(beacon_id, samples)| (beacon_id.clone(), mean(samples)))
        .collect();

    if centroids.is_empty() {
        return Err(FitError::NoCalibrationData);
    }

    Ok(centroids)
}

fn mean(samples: &[f64]) -> f64 {
    samples.iter().sum::<f64>() / samples.len() as f64
}
