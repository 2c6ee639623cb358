//! Home Assistant adapter using the REST API.
//!
//! Counts entities per domain via `/api/states`, typically available on
//! port 8123. Requires a long-lived access token.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use labwatch_types::EntityStats;

use crate::AdapterError;

/// Home Assistant adapter for collecting entity counts.
#[derive(Debug, Clone)]
pub struct HomeAssistantAdapter {
    client: Client,
    endpoint: String,
    token: Option<String>,
}

impl HomeAssistantAdapter {
    /// Create a new builder for configuring the adapter.
    pub fn builder() -> HomeAssistantAdapterBuilder {
        HomeAssistantAdapterBuilder::default()
    }

    /// Collect entity counts grouped by domain.
    ///
    /// Short-circuits with [`AdapterError::MissingToken`] before any network
    /// I/O when no token is configured.
    pub async fn collect(&self) -> Result<EntityStats, AdapterError> {
        let token = self.token.as_deref().ok_or(AdapterError::MissingToken)?;

        let url = format!("{}/api/states", self.endpoint);

        let response = self.client.get(&url).bearer_auth(token).send().await?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(AdapterError::Auth("Invalid access token".to_string()));
        }

        if !response.status().is_success() {
            return Err(AdapterError::Http(format!(
                "API returned status {}",
                response.status()
            )));
        }

        let states: Vec<EntityState> = response
            .json()
            .await
            .map_err(|e| AdapterError::Parse(e.to_string()))?;

        Ok(states_to_stats(&states))
    }
}

/// Group entities by the prefix of their id before the first separator.
/// Domain counts always sum to the entity total.
fn states_to_stats(states: &[EntityState]) -> EntityStats {
    let mut stats = EntityStats::default();
    for state in states {
        stats.record(&state.entity_id);
    }
    stats
}

/// Builder for HomeAssistantAdapter.
#[derive(Debug, Default)]
pub struct HomeAssistantAdapterBuilder {
    endpoint: Option<String>,
    token: Option<String>,
    timeout: Option<Duration>,
}

impl HomeAssistantAdapterBuilder {
    /// Set the Home Assistant base URL (e.g., "http://localhost:8123").
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the long-lived access token.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set a token that may be absent, as read from a service descriptor.
    pub fn maybe_token(mut self, token: Option<impl Into<String>>) -> Self {
        self.token = token.map(Into::into);
        self
    }

    /// Set the request timeout (default: 10 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the adapter.
    pub fn build(self) -> HomeAssistantAdapter {
        let timeout = self.timeout.unwrap_or(Duration::from_secs(10));

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build HTTP client");

        HomeAssistantAdapter {
            client,
            endpoint: self
                .endpoint
                .unwrap_or_else(|| "http://localhost:8123".to_string()),
            token: self.token,
        }
    }
}

/// One entity state from `/api/states`, reduced to the id the grouping
/// needs.
#[derive(Debug, Deserialize)]
struct EntityState {
    entity_id: String,
}
