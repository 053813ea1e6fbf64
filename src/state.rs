//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds the raid store, the topic broker, and the loaded config. The
//! store is internally synchronized, so handlers share it through a plain
//! `Arc` with no outer lock.

use std::sync::Arc;

use crate::config::Config;
use crate::services::pubsub::Broker;
use crate::store::RaidStore;

/// Clone is required by Axum; every field is Arc-backed.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RaidStore>,
    pub broker: Broker,
    pub config: Arc<Config>,
}

impl AppState {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            store: Arc::new(RaidStore::new(config.spawn_defaults)),
            broker: Broker::new(),
            config: Arc::new(config),
        }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================

#[cfg(test)]
#[path = "state_helpers_test.rs"]
pub mod test_helpers;

#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
