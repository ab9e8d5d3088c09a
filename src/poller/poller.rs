use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::{json, Map, Value};

use crate::store::{NewTelemetry, SatelliteId, Store, TelemetryPoint, Visibility};

use super::error::PollError;
use super::provider::PositionProvider;
use super::types::{Observer, PositionSample, PositionsPayload};

/// Provider payload plus the telemetry row stored from it.
#[derive(Debug, Clone)]
pub struct LiveReading {
    pub payload: Value,
    pub telemetry: TelemetryPoint,
}

impl LiveReading {
    /// The provider payload with the stored row added as `telemetryData`.
    pub fn into_body(self) -> Value {
        let mut body = match self.payload {
            Value::Object(map) => map,
            other => {
                let mut map = Map::new();
                map.insert("payload".into(), other);
                map
            }
        };
        body.insert("telemetryData".into(), json!(self.telemetry));
        Value::Object(body)
    }
}

/// Fetches one live position and appends it to the telemetry history.
///
/// The provider is called without holding any store lock; the store is only
/// touched once a complete sample has been mapped. Calls are not retried and
/// concurrent polls of one satellite are not merged.
pub struct LivePoller {
    store: Arc<Store>,
    provider: Arc<dyn PositionProvider>,
    observer: Observer,
}

impl LivePoller {
    pub fn new(store: Arc<Store>, provider: Arc<dyn PositionProvider>, observer: Observer) -> Self {
        Self {
            store,
            provider,
            observer,
        }
    }

    pub fn default_observer(&self) -> Observer {
        self.observer
    }

    pub async fn poll(
        &self,
        satellite_id: SatelliteId,
        observer: Observer,
    ) -> Result<LiveReading, PollError> {
        let satellite = self
            .store
            .satellite(satellite_id)
            .ok_or(PollError::SatelliteNotFound(satellite_id))?;

        let payload = self.provider.positions(satellite.norad_id, observer).await?;

        let decoded: PositionsPayload = serde_json::from_value(payload.clone())
            .map_err(|e| PollError::Upstream(format!("unexpected provider payload: {}", e)))?;
        let velocity = decoded.info.as_ref().and_then(|i| i.velocity);
        let sample = decoded.positions.first().ok_or(PollError::NoPositions)?;

        let reading = to_telemetry(satellite_id, sample, velocity, Utc::now());
        let telemetry = self
            .store
            .create_telemetry(reading)
            .map_err(|e| PollError::Upstream(format!("unusable provider sample: {}", e)))?;

        log::debug!(
            "Stored live position {} for {} ({:.3}, {:.3})",
            telemetry.id,
            satellite.name,
            telemetry.latitude,
            telemetry.longitude
        );

        Ok(LiveReading { payload, telemetry })
    }
}

fn to_telemetry(
    satellite_id: SatelliteId,
    sample: &PositionSample,
    velocity: Option<f64>,
    polled_at: DateTime<Utc>,
) -> NewTelemetry {
    let timestamp = sample
        .timestamp
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .unwrap_or(polled_at);

    NewTelemetry {
        satellite_id: Some(satellite_id),
        timestamp,
        latitude: sample.satlatitude,
        longitude: sample.satlongitude,
        altitude: sample.sataltitude,
        azimuth: sample.azimuth,
        declination: sample.dec,
        right_ascension: sample.ra,
        velocity,
        visibility: Some(Visibility::from_eclipsed(sample.eclipsed).to_string()),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;
    use crate::poller::N2yoClient;

    enum Reply {
        Payload(Value),
        Fail(PollError),
    }

    struct FakeProvider {
        reply: Mutex<Option<Reply>>,
        requests: Mutex<Vec<(u32, Observer)>>,
    }

    impl FakeProvider {
        fn new(reply: Reply) -> Arc<Self> {
            Arc::new(Self {
                reply: Mutex::new(Some(reply)),
                requests: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl PositionProvider for FakeProvider {
        async fn positions(&self, norad_id: u32, observer: Observer) -> Result<Value, PollError> {
            self.requests.lock().unwrap().push((norad_id, observer));
            match self.reply.lock().unwrap().take() {
                Some(Reply::Payload(v)) => Ok(v),
                Some(Reply::Fail(e)) => Err(e),
                None => panic!("provider called twice"),
            }
        }
    }

    fn poller(provider: Arc<dyn PositionProvider>) -> (Arc<Store>, LivePoller) {
        let store = Arc::new(Store::with_default_satellites());
        let poller = LivePoller::new(store.clone(), provider, Observer::default());
        (store, poller)
    }

    fn iss_payload() -> Value {
        json!({
            "info": { "satname": "SPACE STATION", "satid": 25544, "transactionscount": 4, "velocity": 7.66 },
            "positions": [{
                "satlatitude": -39.9,
                "satlongitude": 158.28,
                "sataltitude": 417.85,
                "azimuth": 254.31,
                "elevation": -69.09,
                "ra": 44.77,
                "dec": -43.9,
                "timestamp": 1521354418,
                "eclipsed": true
            }]
        })
    }

    #[tokio::test]
    async fn maps_and_stores_first_sample() {
        let provider = FakeProvider::new(Reply::Payload(iss_payload()));
        let (store, poller) = poller(provider.clone());

        let reading = poller.poll(1, Observer::default()).await.unwrap();
        let t = &reading.telemetry;
        assert_eq!(t.satellite_id, Some(1));
        assert_eq!(t.latitude, -39.9);
        assert_eq!(t.longitude, 158.28);
        assert_eq!(t.altitude, 417.85);
        assert_eq!(t.azimuth, Some(254.31));
        assert_eq!(t.declination, Some(-43.9));
        assert_eq!(t.right_ascension, Some(44.77));
        assert_eq!(t.velocity, Some(7.66));
        assert_eq!(t.visibility.as_deref(), Some("eclipse"));
        assert_eq!(t.timestamp.timestamp(), 1521354418);

        assert_eq!(store.telemetry_for(1), vec![reading.telemetry.clone()]);
        assert_eq!(provider.requests.lock().unwrap()[0].0, 25544);

        let body = reading.into_body();
        assert_eq!(body["info"]["satid"], 25544);
        assert_eq!(body["telemetryData"]["visibility"], "eclipse");
        assert_eq!(body["telemetryData"]["satelliteId"], 1);
    }

    #[tokio::test]
    async fn uses_requested_observer() {
        let provider = FakeProvider::new(Reply::Payload(iss_payload()));
        let (_store, poller) = poller(provider.clone());
        let observer = poller
            .default_observer()
            .with_overrides(Some(40.0), None, Some(120.0));

        poller.poll(1, observer).await.unwrap();

        let (_, seen) = provider.requests.lock().unwrap()[0];
        assert_eq!(seen.latitude, 40.0);
        assert_eq!(seen.longitude, -0.1278);
        assert_eq!(seen.altitude_m, 120.0);
    }

    #[tokio::test]
    async fn visible_when_not_eclipsed_and_now_without_timestamp() {
        let payload = json!({
            "positions": [{ "satlatitude": 1.0, "satlongitude": 2.0, "sataltitude": 500.0 }]
        });
        let (_store, poller) = poller(FakeProvider::new(Reply::Payload(payload)));

        let before = Utc::now();
        let reading = poller.poll(2, Observer::default()).await.unwrap();
        assert_eq!(reading.telemetry.visibility.as_deref(), Some("visible"));
        assert!(reading.telemetry.timestamp >= before);
        assert_eq!(reading.telemetry.velocity, None);
    }

    #[tokio::test]
    async fn unknown_satellite_is_not_found() {
        let provider = FakeProvider::new(Reply::Payload(iss_payload()));
        let (store, poller) = poller(provider.clone());

        let err = poller.poll(99, Observer::default()).await.unwrap_err();
        assert!(matches!(err, PollError::SatelliteNotFound(99)));
        assert!(provider.requests.lock().unwrap().is_empty());
        assert_eq!(store.telemetry_count(), 0);
    }

    #[tokio::test]
    async fn empty_positions_store_nothing() {
        let payload = json!({ "info": { "satid": 25544 }, "positions": [] });
        let (store, poller) = poller(FakeProvider::new(Reply::Payload(payload)));

        let err = poller.poll(1, Observer::default()).await.unwrap_err();
        assert!(matches!(err, PollError::NoPositions));
        assert_eq!(store.telemetry_count(), 0);
    }

    #[tokio::test]
    async fn upstream_failure_stores_nothing() {
        let provider = FakeProvider::new(Reply::Fail(PollError::Upstream("HTTP 500".into())));
        let (store, poller) = poller(provider);

        let err = poller.poll(1, Observer::default()).await.unwrap_err();
        assert!(matches!(err, PollError::Upstream(_)));
        assert_eq!(store.telemetry_count(), 0);
    }

    #[tokio::test]
    async fn partial_sample_stores_nothing() {
        let payload = json!({ "positions": [{ "satlatitude": 1.0, "azimuth": 3.0 }] });
        let (store, poller) = poller(FakeProvider::new(Reply::Payload(payload)));

        let err = poller.poll(1, Observer::default()).await.unwrap_err();
        assert!(matches!(err, PollError::Upstream(_)));
        assert_eq!(store.telemetry_count(), 0);
    }

    #[tokio::test]
    async fn missing_credential_is_configuration_error_without_write() {
        let provider = N2yoClient::new("http://127.0.0.1:9", None, Duration::from_secs(1)).unwrap();
        let (store, poller) = poller(Arc::new(provider));

        let err = poller.poll(1, Observer::default()).await.unwrap_err();
        assert!(matches!(err, PollError::Configuration(_)));
        assert_eq!(store.telemetry_count(), 0);
    }
}
