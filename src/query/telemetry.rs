use chrono::{DateTime, Utc};

use crate::store::{SatelliteId, Store, TelemetryPoint};

use super::window::HoursWindow;

/// Most recent sample of `satellite` by timestamp. On equal timestamps the
/// sample stored last wins.
pub fn latest(store: &Store, satellite: SatelliteId) -> Option<TelemetryPoint> {
    store
        .telemetry_for(satellite)
        .into_iter()
        .max_by_key(|p| p.timestamp)
}

/// Samples of `satellite` with `timestamp >= now - window`, oldest first.
/// Equal timestamps keep insertion order.
pub fn history(
    store: &Store,
    satellite: SatelliteId,
    window: HoursWindow,
    now: DateTime<Utc>,
) -> Vec<TelemetryPoint> {
    let since = window.since(now);
    let mut points: Vec<TelemetryPoint> = store
        .telemetry_for(satellite)
        .into_iter()
        .filter(|p| p.timestamp >= since)
        .collect();
    points.sort_by_key(|p| p.timestamp);
    points
}
