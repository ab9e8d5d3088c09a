mod collection;
mod error;
mod seed;
mod store;
mod types;

pub use error::StoreError;
pub use store::Store;
pub use types::{
    NewOrbitalElements, NewPass, NewSatellite, NewTelemetry, OrbitalElements, Satellite,
    SatelliteId, SatellitePass, SatelliteUpdate, TelemetryPoint, Visibility,
};
