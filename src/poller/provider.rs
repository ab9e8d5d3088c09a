use std::time::Duration;

use async_trait::async_trait;

use super::error::PollError;
use super::types::Observer;

/// Source of live satellite positions.
#[async_trait]
pub trait PositionProvider: Send + Sync {
    /// Raw positions payload for one sample of `norad_id` seen from `observer`.
    async fn positions(
        &self,
        norad_id: u32,
        observer: Observer,
    ) -> Result<serde_json::Value, PollError>;
}

/// N2YO REST positions endpoint.
pub struct N2yoClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl N2yoClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, PollError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PollError::Configuration(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        })
    }

    fn positions_path(&self, norad_id: u32, observer: Observer) -> String {
        format!(
            "{}/positions/{}/{}/{}/{}/1/",
            self.base_url, norad_id, observer.latitude, observer.longitude, observer.altitude_m
        )
    }
}

#[async_trait]
impl PositionProvider for N2yoClient {
    async fn positions(
        &self,
        norad_id: u32,
        observer: Observer,
    ) -> Result<serde_json::Value, PollError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| PollError::Configuration("N2YO API key not configured".into()))?;

        let path = self.positions_path(norad_id, observer);
        log::debug!("Requesting positions from {}", path);

        let response = self
            .client
            .get(format!("{}&apiKey={}", path, api_key))
            .send()
            .await
            // The request URL carries the key.
            .map_err(|e| PollError::Upstream(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PollError::Upstream(format!(
                "provider returned HTTP {} for NORAD {}",
                status, norad_id
            )));
        }

        response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| PollError::Upstream(format!("invalid provider payload: {}", e.without_url())))
    }
}
