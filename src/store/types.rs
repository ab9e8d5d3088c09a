use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::Display;
use utoipa::ToSchema;

use super::error::StoreError;

pub type SatelliteId = u64;

/// A tracked satellite. Never deleted, only deactivated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Satellite {
    pub id: SatelliteId,
    pub norad_id: u32,
    pub name: String,
    pub category: Option<String>,
    pub launch_date: Option<String>,
    pub country: Option<String>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewSatellite {
    pub norad_id: u32,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub launch_date: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// Partial satellite update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SatelliteUpdate {
    #[serde(default)]
    pub norad_id: Option<u32>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub launch_date: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl Satellite {
    pub(crate) fn merged(&self, update: SatelliteUpdate) -> Satellite {
        Satellite {
            id: self.id,
            norad_id: update.norad_id.unwrap_or(self.norad_id),
            name: update.name.unwrap_or_else(|| self.name.clone()),
            category: update.category.or_else(|| self.category.clone()),
            launch_date: update.launch_date.or_else(|| self.launch_date.clone()),
            country: update.country.or_else(|| self.country.clone()),
            is_active: update.is_active.unwrap_or(self.is_active),
        }
    }
}

/// Visibility states the live poller derives from the provider's eclipse flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Visibility {
    Visible,
    Eclipse,
}

impl Visibility {
    pub fn from_eclipsed(eclipsed: bool) -> Self {
        if eclipsed {
            Visibility::Eclipse
        } else {
            Visibility::Visible
        }
    }
}

/// A single position sample. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TelemetryPoint {
    pub id: u64,
    pub satellite_id: Option<SatelliteId>,
    pub timestamp: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
    pub azimuth: Option<f64>,
    pub declination: Option<f64>,
    pub right_ascension: Option<f64>,
    pub velocity: Option<f64>,
    /// `visible`, `eclipse` or any raw value supplied by an import.
    pub visibility: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewTelemetry {
    #[serde(default)]
    pub satellite_id: Option<SatelliteId>,
    pub timestamp: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
    #[serde(default)]
    pub azimuth: Option<f64>,
    #[serde(default)]
    pub declination: Option<f64>,
    #[serde(default)]
    pub right_ascension: Option<f64>,
    #[serde(default)]
    pub velocity: Option<f64>,
    #[serde(default)]
    pub visibility: Option<String>,
}

impl NewTelemetry {
    pub fn validate(&self) -> Result<(), StoreError> {
        require_finite("latitude", self.latitude)?;
        require_finite("longitude", self.longitude)?;
        require_finite("altitude", self.altitude)?;
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(StoreError::Validation(format!(
                "latitude {} outside [-90, 90]",
                self.latitude
            )));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(StoreError::Validation(format!(
                "longitude {} outside [-180, 180]",
                self.longitude
            )));
        }
        for (field, value) in [
            ("azimuth", self.azimuth),
            ("declination", self.declination),
            ("rightAscension", self.right_ascension),
            ("velocity", self.velocity),
        ] {
            if let Some(v) = value {
                require_finite(field, v)?;
            }
        }
        Ok(())
    }

    pub(crate) fn into_point(self, id: u64) -> TelemetryPoint {
        TelemetryPoint {
            id,
            satellite_id: self.satellite_id,
            timestamp: self.timestamp,
            latitude: self.latitude,
            longitude: self.longitude,
            altitude: self.altitude,
            azimuth: self.azimuth,
            declination: self.declination,
            right_ascension: self.right_ascension,
            velocity: self.velocity,
            visibility: self.visibility.filter(|v| !v.is_empty()),
        }
    }
}

/// A precomputed visibility window over the observer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SatellitePass {
    pub id: u64,
    pub satellite_id: Option<SatelliteId>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Degrees above the horizon.
    pub max_elevation: f64,
    pub direction: Option<String>,
    pub magnitude: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewPass {
    #[serde(default)]
    pub satellite_id: Option<SatelliteId>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub max_elevation: f64,
    #[serde(default)]
    pub direction: Option<String>,
    #[serde(default)]
    pub magnitude: Option<f64>,
}

impl NewPass {
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.end_time <= self.start_time {
            return Err(StoreError::Validation(
                "endTime must be after startTime".into(),
            ));
        }
        require_finite("maxElevation", self.max_elevation)?;
        if let Some(m) = self.magnitude {
            require_finite("magnitude", m)?;
        }
        Ok(())
    }

    pub(crate) fn into_pass(self, id: u64) -> SatellitePass {
        SatellitePass {
            id,
            satellite_id: self.satellite_id,
            start_time: self.start_time,
            end_time: self.end_time,
            max_elevation: self.max_elevation,
            direction: self.direction,
            magnitude: self.magnitude,
        }
    }
}

/// Mean orbital elements at `epoch`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrbitalElements {
    pub id: u64,
    pub satellite_id: Option<SatelliteId>,
    pub epoch: DateTime<Utc>,
    /// Revolutions per day.
    pub mean_motion: f64,
    pub eccentricity: f64,
    pub inclination: f64,
    pub raan: f64,
    pub arg_perigee: f64,
    pub mean_anomaly: f64,
    pub bstar_drag: Option<f64>,
    /// Minutes.
    pub period: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewOrbitalElements {
    #[serde(default)]
    pub satellite_id: Option<SatelliteId>,
    pub epoch: DateTime<Utc>,
    pub mean_motion: f64,
    pub eccentricity: f64,
    pub inclination: f64,
    pub raan: f64,
    pub arg_perigee: f64,
    pub mean_anomaly: f64,
    #[serde(default)]
    pub bstar_drag: Option<f64>,
    #[serde(default)]
    pub period: Option<f64>,
}

const MINUTES_PER_DAY: f64 = 1440.0;

impl NewOrbitalElements {
    pub fn validate(&self) -> Result<(), StoreError> {
        for (field, value) in [
            ("meanMotion", self.mean_motion),
            ("eccentricity", self.eccentricity),
            ("inclination", self.inclination),
            ("raan", self.raan),
            ("argPerigee", self.arg_perigee),
            ("meanAnomaly", self.mean_anomaly),
        ] {
            require_finite(field, value)?;
        }
        if self.mean_motion <= 0.0 {
            return Err(StoreError::Validation("meanMotion must be positive".into()));
        }
        if !(0.0..1.0).contains(&self.eccentricity) {
            return Err(StoreError::Validation(format!(
                "eccentricity {} outside [0, 1)",
                self.eccentricity
            )));
        }
        if let Some(b) = self.bstar_drag {
            require_finite("bstarDrag", b)?;
        }
        if let Some(p) = self.period {
            require_finite("period", p)?;
        }
        Ok(())
    }

    pub(crate) fn into_elements(self, id: u64) -> OrbitalElements {
        let period = self
            .period
            .or_else(|| Some(MINUTES_PER_DAY / self.mean_motion));
        OrbitalElements {
            id,
            satellite_id: self.satellite_id,
            epoch: self.epoch,
            mean_motion: self.mean_motion,
            eccentricity: self.eccentricity,
            inclination: self.inclination,
            raan: self.raan,
            arg_perigee: self.arg_perigee,
            mean_anomaly: self.mean_anomaly,
            bstar_drag: self.bstar_drag,
            period,
        }
    }
}

fn require_finite(field: &str, value: f64) -> Result<(), StoreError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(StoreError::Validation(format!("{} must be a finite number", field)))
    }
}
