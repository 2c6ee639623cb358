//! Portainer adapter using the Docker endpoint API.
//!
//! Counts containers through Portainer's proxied Docker API, typically
//! available on port 9000. Requires an API key created in the Portainer UI.
//!
//! ## Example
//!
//! ```rust,no_run
//! use labwatch_adapters::portainer::PortainerAdapter;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let adapter = PortainerAdapter::builder()
//!         .endpoint("http://localhost:9000")
//!         .token("ptr_secret")
//!         .build();
//!
//!     let stats = adapter.collect().await?;
//!     println!("running: {}, stopped: {}", stats.running, stats.stopped);
//!     Ok(())
//! }
//! ```

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use labwatch_types::ContainerStats;

use crate::AdapterError;

/// The Docker state string that counts as running. Everything else is
/// treated as stopped.
const RUNNING_STATE: &str = "running";

/// Portainer adapter for collecting container counts.
#[derive(Debug, Clone)]
pub struct PortainerAdapter {
    client: Client,
    endpoint: String,
    token: Option<String>,
    endpoint_id: u32,
}

impl PortainerAdapter {
    /// Create a new builder for configuring the adapter.
    pub fn builder() -> PortainerAdapterBuilder {
        PortainerAdapterBuilder::default()
    }

    /// Collect the current container counts.
    ///
    /// Short-circuits with [`AdapterError::MissingToken`] before any network
    /// I/O when no token is configured.
    pub async fn collect(&self) -> Result<ContainerStats, AdapterError> {
        let token = self.token.as_deref().ok_or(AdapterError::MissingToken)?;

        let url = format!(
            "{}/api/endpoints/{}/docker/containers/json?all=true",
            self.endpoint, self.endpoint_id
        );

        let response = self.client.get(&url).header("X-API-Key", token).send().await?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(AdapterError::Auth("Invalid API token".to_string()));
        }

        if !response.status().is_success() {
            return Err(AdapterError::Http(format!(
                "API returned status {}",
                response.status()
            )));
        }

        let containers: Vec<ContainerInfo> = response
            .json()
            .await
            .map_err(|e| AdapterError::Parse(e.to_string()))?;

        Ok(containers_to_stats(&containers))
    }
}

/// Partition containers into running vs. stopped. The total is derived,
/// never counted separately.
fn containers_to_stats(containers: &[ContainerInfo]) -> ContainerStats {
    let running = containers.iter().filter(|c| c.state == RUNNING_STATE).count() as u64;
    let stopped = containers.len() as u64 - running;
    ContainerStats::from_counts(running, stopped)
}

/// Builder for PortainerAdapter.
#[derive(Debug, Default)]
pub struct PortainerAdapterBuilder {
    endpoint: Option<String>,
    token: Option<String>,
    endpoint_id: Option<u32>,
    timeout: Option<Duration>,
}

impl PortainerAdapterBuilder {
    /// Set the Portainer base URL (e.g., "http://localhost:9000").
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the API key used for the `X-API-Key` header.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set a token that may be absent, as read from a service descriptor.
    pub fn maybe_token(mut self, token: Option<impl Into<String>>) -> Self {
        self.token = token.map(Into::into);
        self
    }

    /// Set the Portainer endpoint id to query (default: 1, the local
    /// Docker environment).
    pub fn endpoint_id(mut self, id: u32) -> Self {
        self.endpoint_id = Some(id);
        self
    }

    /// Set the request timeout (default: 10 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the adapter.
    pub fn build(self) -> PortainerAdapter {
        let timeout = self.timeout.unwrap_or(Duration::from_secs(10));

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build HTTP client");

        PortainerAdapter {
            client,
            endpoint: self
                .endpoint
                .unwrap_or_else(|| "http://localhost:9000".to_string()),
            token: self.token,
            endpoint_id: self.endpoint_id.unwrap_or(1),
        }
    }
}

/// Container information from the Docker API, reduced to what the counts
/// need.
#[derive(Debug, Deserialize)]
struct ContainerInfo {
    #[serde(rename = "State", default)]
    state: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn container(state: &str) -> ContainerInfo {
        ContainerInfo { state: state.to_string() }
    }

    #[test]
    fn test_builder_defaults() {
        let adapter = PortainerAdapter::builder().build();
        assert_eq!(adapter.endpoint, "http://localhost:9000");
        assert_eq!(adapter.endpoint_id, 1);
        assert!(adapter.token.is_none());
    }

    #[test]
    fn test_builder_custom() {
        let adapter = PortainerAdapter::builder()
            .endpoint("http://portainer.local:9443")
            .token("ptr_abc")
            .endpoint_id(2)
            .build();

        assert_eq!(adapter.endpoint, "http://portainer.local:9443");
        assert_eq!(adapter.token.as_deref(), Some("ptr_abc"));
        assert_eq!(adapter.endpoint_id, 2);
    }

    #[tokio::test]
    async fn test_missing_token_short_circuits() {
        // Endpoint points nowhere; a network attempt would fail with a
        // connection error, so MissingToken proves no I/O happened.
        let adapter = PortainerAdapter::builder()
            .endpoint("http://127.0.0.1:1")
            .build();

        let err = adapter.collect().await.unwrap_err();
        assert!(matches!(err, AdapterError::MissingToken));
    }

    #[test]
    fn test_counts_partition_by_state() {
        let containers = vec![
            container("running"),
            container("running"),
            container("exited"),
            container("created"),
            container("paused"),
        ];

        let stats = containers_to_stats(&containers);
        assert_eq!(stats.running, 2);
        assert_eq!(stats.stopped, 3);
        assert_eq!(stats.total, 5);
        assert!(stats.is_consistent());
    }

    #[test]
    fn test_total_invariant_over_partitions() {
        // running + stopped == total must hold for any partition of states
        let states = ["running", "exited", "dead", "restarting", "running", "removing"];
        for cut in 0..=states.len() {
            let containers: Vec<ContainerInfo> =
                states[..cut].iter().map(|s| container(s)).collect();
            let stats = containers_to_stats(&containers);
            assert_eq!(stats.running + stats.stopped, stats.total);
            assert_eq!(stats.total, cut as u64);
        }
    }

    #[test]
    fn test_empty_container_list() {
        let stats = containers_to_stats(&[]);
        assert_eq!(stats, ContainerStats::from_counts(0, 0));
    }

    #[test]
    fn test_payload_parses_docker_shape() {
        let json = r#"[
            {"Id": "abc", "Names": ["/nginx"], "State": "running", "Status": "Up 2 hours", "Image": "nginx"},
            {"Id": "def", "Names": ["/db"], "State": "exited", "Status": "Exited (0)", "Image": "postgres"}
        ]"#;

        let containers: Vec<ContainerInfo> = serde_json::from_str(json).unwrap();
        let stats = containers_to_stats(&containers);
        assert_eq!(stats.running, 1);
        assert_eq!(stats.stopped, 1);
    }
}
