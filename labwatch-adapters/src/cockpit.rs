//! Cockpit adapter using the system info endpoint.
//!
//! Reads host information from `/cockpit/system/info`, typically available
//! on port 9090. Authentication is cookie/session based and handled by the
//! HTTP client's cookie store or a reverse proxy, not by this adapter.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use labwatch_types::SystemInfo;

use crate::AdapterError;

/// Cockpit adapter for collecting host system information.
#[derive(Debug, Clone)]
pub struct CockpitAdapter {
    client: Client,
    endpoint: String,
}

impl CockpitAdapter {
    /// Create a new builder for configuring the adapter.
    pub fn builder() -> CockpitAdapterBuilder {
        CockpitAdapterBuilder::default()
    }

    /// Collect the current system information.
    ///
    /// Missing fields in the payload map to neutral defaults; only the
    /// transport itself can fail.
    pub async fn collect(&self) -> Result<SystemInfo, AdapterError> {
        let url = format!("{}/cockpit/system/info", self.endpoint);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AdapterError::Http(format!(
                "API returned status {} - Cockpit API not accessible",
                response.status()
            )));
        }

        let payload: CockpitPayload = response
            .json()
            .await
            .map_err(|e| AdapterError::Parse(e.to_string()))?;

        Ok(payload_to_info(payload))
    }
}

/// Map the vendor payload onto the normalized shape, defaulting every
/// field Cockpit didn't report.
fn payload_to_info(payload: CockpitPayload) -> SystemInfo {
    let defaults = SystemInfo::default();
    SystemInfo {
        hostname: payload.hostname.unwrap_or(defaults.hostname),
        os: payload.operating_system.unwrap_or(defaults.os),
        kernel: payload.kernel.unwrap_or(defaults.kernel),
        cpu_count: payload.cpu_count.unwrap_or(0),
        memory_total: payload.memory_total.unwrap_or(0),
        memory_used: payload.memory_used.unwrap_or(0),
        load_average: normalize_load(payload.load_average),
        ..defaults
    }
}

/// Pad or truncate the vendor load list to the 1/5/15 triple.
fn normalize_load(load: Option<Vec<f64>>) -> [f64; 3] {
    let mut out = [0.0; 3];
    if let Some(values) = load {
        for (slot, value) in out.iter_mut().zip(values) {
            *slot = value;
        }
    }
    out
}

/// Builder for CockpitAdapter.
#[derive(Debug, Default)]
pub struct CockpitAdapterBuilder {
    endpoint: Option<String>,
    timeout: Option<Duration>,
}

impl CockpitAdapterBuilder {
    /// Set the Cockpit base URL (e.g., "http://localhost:9090").
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the request timeout (default: 10 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the adapter.
    pub fn build(self) -> CockpitAdapter {
        let timeout = self.timeout.unwrap_or(Duration::from_secs(10));

        let client = Client::builder()
            .timeout(timeout)
            .cookie_store(true)
            .build()
            .expect("Failed to build HTTP client");

        CockpitAdapter {
            client,
            endpoint: self
                .endpoint
                .unwrap_or_else(|| "http://localhost:9090".to_string()),
        }
    }
}

/// System info payload from Cockpit. Every field is optional; absent
/// fields fall back to the normalized defaults.
#[derive(Debug, Default, Deserialize)]
struct CockpitPayload {
    hostname: Option<String>,
    operating_system: Option<String>,
    kernel: Option<String>,
    cpu_count: Option<u32>,
    memory_total: Option<u64>,
    memory_used: Option<u64>,
    load_average: Option<Vec<f64>>,
}
