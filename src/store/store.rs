use super::collection::Collection;
use super::error::StoreError;
use super::seed::default_satellites;
use super::types::{
    NewOrbitalElements, NewPass, NewSatellite, NewTelemetry, OrbitalElements, Satellite,
    SatelliteId, SatellitePass, SatelliteUpdate, TelemetryPoint,
};

/// In-memory home of the four entity collections.
///
/// Each collection carries its own lock, so a telemetry write never waits on
/// a pass read. Foreign `satelliteId` references are not checked: orphans are
/// stored as given.
#[derive(Default)]
pub struct Store {
    satellites: Collection<Satellite>,
    telemetry: Collection<TelemetryPoint>,
    passes: Collection<SatellitePass>,
    elements: Collection<OrbitalElements>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_satellites() -> Self {
        let store = Self::new();
        for satellite in default_satellites() {
            let name = satellite.name.clone();
            if let Err(e) = store.create_satellite(satellite) {
                log::warn!("Failed to seed satellite {}: {}", name, e);
            }
        }
        log::info!("Seeded store with {} satellites", store.satellites.len());
        store
    }

    /// Every satellite, active or not, in creation order.
    pub fn satellites(&self) -> Vec<Satellite> {
        self.satellites.list()
    }

    pub fn satellite(&self, id: SatelliteId) -> Option<Satellite> {
        self.satellites.get(id)
    }

    pub fn satellite_by_norad_id(&self, norad_id: u32) -> Option<Satellite> {
        self.satellites.find(|s| s.norad_id == norad_id)
    }

    pub fn create_satellite(&self, new: NewSatellite) -> Result<Satellite, StoreError> {
        if new.name.trim().is_empty() {
            return Err(StoreError::Validation("name must not be empty".into()));
        }

        self.satellites.try_insert_with(|id, mut existing| {
            if existing.any(|s| s.norad_id == new.norad_id) {
                return Err(StoreError::DuplicateNoradId(new.norad_id));
            }
            Ok(Satellite {
                id,
                norad_id: new.norad_id,
                name: new.name,
                category: new.category,
                launch_date: new.launch_date,
                country: new.country,
                is_active: new.is_active,
            })
        })
    }

    /// Shallow merge of `update` into satellite `id`. `Ok(None)` if there is no such satellite.
    pub fn update_satellite(
        &self,
        id: SatelliteId,
        update: SatelliteUpdate,
    ) -> Result<Option<Satellite>, StoreError> {
        if update.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(StoreError::Validation("name must not be empty".into()));
        }

        self.satellites.try_update(id, |current, mut others| {
            let merged = current.merged(update);
            if others.any(|s| s.id != id && s.norad_id == merged.norad_id) {
                return Err(StoreError::DuplicateNoradId(merged.norad_id));
            }
            Ok(merged)
        })
    }

    pub fn create_telemetry(&self, new: NewTelemetry) -> Result<TelemetryPoint, StoreError> {
        new.validate()?;
        self.log_orphan("telemetry", new.satellite_id);
        Ok(self.telemetry.insert_with(|id| new.into_point(id)))
    }

    /// Telemetry of one satellite in insertion order.
    pub fn telemetry_for(&self, satellite: SatelliteId) -> Vec<TelemetryPoint> {
        self.telemetry.for_satellite(satellite)
    }

    #[cfg(test)]
    pub fn telemetry_count(&self) -> usize {
        self.telemetry.len()
    }

    pub fn create_pass(&self, new: NewPass) -> Result<SatellitePass, StoreError> {
        new.validate()?;
        self.log_orphan("pass", new.satellite_id);
        Ok(self.passes.insert_with(|id| new.into_pass(id)))
    }

    pub fn passes(&self) -> Vec<SatellitePass> {
        self.passes.list()
    }

    pub fn passes_for(&self, satellite: SatelliteId) -> Vec<SatellitePass> {
        self.passes.for_satellite(satellite)
    }

    pub fn create_orbital_elements(
        &self,
        new: NewOrbitalElements,
    ) -> Result<OrbitalElements, StoreError> {
        new.validate()?;
        self.log_orphan("orbital elements", new.satellite_id);
        Ok(self.elements.insert_with(|id| new.into_elements(id)))
    }

    pub fn orbital_elements_for(&self, satellite: SatelliteId) -> Vec<OrbitalElements> {
        self.elements.for_satellite(satellite)
    }

    fn log_orphan(&self, kind: &str, satellite: Option<SatelliteId>) {
        if let Some(id) = satellite {
            if self.satellites.get(id).is_none() {
                log::debug!("Storing {} for unknown satellite {}", kind, id);
            }
        }
    }
}
