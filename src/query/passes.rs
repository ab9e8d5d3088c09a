use chrono::{DateTime, Utc};

use crate::store::{SatelliteId, SatellitePass, Store};

use super::window::HoursWindow;

/// Passes starting within `[now, now + window]`, earliest first, optionally
/// restricted to one satellite.
pub fn upcoming(
    store: &Store,
    satellite: Option<SatelliteId>,
    window: HoursWindow,
    now: DateTime<Utc>,
) -> Vec<SatellitePass> {
    let until = window.until(now);
    let candidates = match satellite {
        Some(id) => store.passes_for(id),
        None => store.passes(),
    };

    let mut passes: Vec<SatellitePass> = candidates
        .into_iter()
        .filter(|p| p.start_time >= now && p.start_time <= until)
        .collect();
    passes.sort_by_key(|p| p.start_time);
    passes
}
