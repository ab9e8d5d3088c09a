use crate::store::{OrbitalElements, SatelliteId, Store};

/// Snapshot with the newest epoch. On equal epochs the one stored last wins.
pub fn latest(store: &Store, satellite: SatelliteId) -> Option<OrbitalElements> {
    store
        .orbital_elements_for(satellite)
        .into_iter()
        .max_by_key(|e| e.epoch)
}
