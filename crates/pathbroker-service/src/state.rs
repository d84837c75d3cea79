//! Shared application state for the HTTP handlers.

use std::sync::Arc;

use pathbroker_lib::{BrokerConfig, PathBroker};

/// Cheaply cloneable handle to the broker.
#[derive(Clone)]
pub struct AppState {
    broker: Arc<PathBroker>,
}

impl AppState {
    /// Build the broker from configuration, loading the gazetteer.
    pub fn from_config(config: &BrokerConfig) -> pathbroker_lib::Result<Self> {
        Ok(Self::from_broker(PathBroker::from_config(config)?))
    }

    pub fn from_broker(broker: PathBroker) -> Self {
        Self {
            broker: Arc::new(broker),
        }
    }

    pub fn broker(&self) -> &PathBroker {
        &self.broker
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("locations", &self.broker.gazetteer().len())
            .field("max_concurrent", &self.broker.orchestrator().max_concurrent())
            .finish()
    }
}
