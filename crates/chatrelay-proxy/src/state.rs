//! Shared application state type.
//!
//! Defines the `AppState` type used across all handlers.

use std::sync::Arc;

use chatrelay_core::RelayConfig;
use reqwest::Client;

/// Read-only state shared by every request.
#[derive(Debug)]
pub struct RelayState {
    /// Relay settings, including the optional upstream API key.
    pub config: RelayConfig,
    /// Pooled HTTP client for upstream calls.
    pub client: Client,
}

impl RelayState {
    /// Build the state and its upstream client from a config.
    pub fn new(config: RelayConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .pool_max_idle_per_host(10)
            .build()?;

        Ok(Self { config, client })
    }
}

/// Application state shared across all handlers.
pub type AppState = Arc<RelayState>;
