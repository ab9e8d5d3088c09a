use thiserror::Error;

use crate::store::SatelliteId;

#[derive(Debug, Error)]
pub enum PollError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("satellite {0} not found")]
    SatelliteNotFound(SatelliteId),
    #[error("no position data available")]
    NoPositions,
    #[error("upstream error: {0}")]
    Upstream(String),
}
