use std::sync::Arc;

use crate::poller::{LivePoller, N2yoClient, PositionProvider};
use crate::store::Store;

use super::config::{Config, ConfigError};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<Store>,
    pub poller: Arc<LivePoller>,
}

impl AppState {
    pub fn new(config: Config, store: Arc<Store>, provider: Arc<dyn PositionProvider>) -> Self {
        let poller = LivePoller::new(store.clone(), provider, config.observer);
        Self {
            config: Arc::new(config),
            store,
            poller: Arc::new(poller),
        }
    }

    /// Build the store and the N2YO client described by `config`.
    pub fn from_config(config: Config) -> Result<Self, ConfigError> {
        let store = if config.seed.default_satellites {
            Store::with_default_satellites()
        } else {
            Store::new()
        };

        let api_key = config.provider.resolve_api_key();
        if api_key.is_none() {
            log::warn!("No tracking provider API key configured; live polling is disabled");
        }
        let provider = N2yoClient::new(
            config.provider.base_url.clone(),
            api_key,
            config.provider.timeout()?,
        )?;

        Ok(Self::new(config, Arc::new(store), Arc::new(provider)))
    }
}
