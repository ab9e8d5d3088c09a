use chrono::{DateTime, Duration, Utc};

pub const DEFAULT_WINDOW_HOURS: f64 = 24.0;

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Length of a query window in hours. Always positive and finite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoursWindow(f64);

impl Default for HoursWindow {
    fn default() -> Self {
        HoursWindow(DEFAULT_WINDOW_HOURS)
    }
}

impl HoursWindow {
    /// Non-positive or non-finite values fall back to the default window.
    pub fn new(hours: f64) -> Self {
        if hours.is_finite() && hours > 0.0 {
            HoursWindow(hours)
        } else {
            HoursWindow::default()
        }
    }

    /// Parse an `hours` query parameter. Anything unusable means the default.
    pub fn from_param(raw: Option<&str>) -> Self {
        raw.and_then(|s| s.trim().parse::<f64>().ok())
            .map(HoursWindow::new)
            .unwrap_or_default()
    }

    #[cfg(test)]
    pub fn hours(&self) -> f64 {
        self.0
    }

    fn duration(&self) -> Option<Duration> {
        Duration::try_milliseconds((self.0 * MILLIS_PER_HOUR) as i64)
    }

    /// Start of a window ending at `now`.
    pub fn since(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.duration()
            .and_then(|d| now.checked_sub_signed(d))
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// End of a window starting at `now`.
    pub fn until(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.duration()
            .and_then(|d| now.checked_add_signed(d))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}
