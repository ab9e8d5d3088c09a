use serde::Deserialize;

pub const DEFAULT_OBSERVER_LATITUDE: f64 = 51.5074;
pub const DEFAULT_OBSERVER_LONGITUDE: f64 = -0.1278;

/// Ground position the provider computes look angles from.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Observer {
    #[serde(default = "default_latitude")]
    pub latitude: f64,
    #[serde(default = "default_longitude")]
    pub longitude: f64,
    #[serde(default)]
    pub altitude_m: f64,
}

fn default_latitude() -> f64 {
    DEFAULT_OBSERVER_LATITUDE
}

fn default_longitude() -> f64 {
    DEFAULT_OBSERVER_LONGITUDE
}

impl Default for Observer {
    fn default() -> Self {
        Self {
            latitude: DEFAULT_OBSERVER_LATITUDE,
            longitude: DEFAULT_OBSERVER_LONGITUDE,
            altitude_m: 0.0,
        }
    }
}

impl Observer {
    pub fn with_overrides(
        self,
        latitude: Option<f64>,
        longitude: Option<f64>,
        altitude_m: Option<f64>,
    ) -> Self {
        Self {
            latitude: latitude.unwrap_or(self.latitude),
            longitude: longitude.unwrap_or(self.longitude),
            altitude_m: altitude_m.unwrap_or(self.altitude_m),
        }
    }
}

/// The parts of a provider positions payload that end up in telemetry.
#[derive(Debug, Clone, Deserialize)]
pub struct PositionsPayload {
    #[serde(default)]
    pub info: Option<PositionsInfo>,
    #[serde(default)]
    pub positions: Vec<PositionSample>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PositionsInfo {
    #[serde(default)]
    pub velocity: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PositionSample {
    pub satlatitude: f64,
    pub satlongitude: f64,
    /// Kilometres.
    pub sataltitude: f64,
    #[serde(default)]
    pub azimuth: Option<f64>,
    #[serde(default)]
    pub ra: Option<f64>,
    #[serde(default)]
    pub dec: Option<f64>,
    /// Unix seconds.
    #[serde(default)]
    pub timestamp: Option<i64>,
    #[serde(default)]
    pub eclipsed: bool,
}
