//! Webmin adapter using the sysinfo CGI endpoint.
//!
//! Reads uptime, sessions, process count, and load averages from
//! `sysinfo.cgi?mode=json`, typically available on port 10000. Session
//! auth is handled by the HTTP client's cookie store.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use labwatch_types::SystemInfo;

use crate::AdapterError;

/// Webmin adapter for collecting host status.
#[derive(Debug, Clone)]
pub struct WebminAdapter {
    client: Client,
    endpoint: String,
}

impl WebminAdapter {
    /// Create a new builder for configuring the adapter.
    pub fn builder() -> WebminAdapterBuilder {
        WebminAdapterBuilder::default()
    }

    /// Collect the current host status.
    ///
    /// Fields Webmin doesn't report keep their neutral defaults.
    pub async fn collect(&self) -> Result<SystemInfo, AdapterError> {
        let url = format!("{}/sysinfo.cgi?mode=json", self.endpoint);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AdapterError::Http(format!(
                "API returned status {} - Webmin API not accessible",
                response.status()
            )));
        }

        let payload: WebminPayload = response
            .json()
            .await
            .map_err(|e| AdapterError::Parse(e.to_string()))?;

        Ok(payload_to_info(payload))
    }
}

fn payload_to_info(payload: WebminPayload) -> SystemInfo {
    let mut load_average = [0.0; 3];
    if let Some(values) = payload.load {
        for (slot, value) in load_average.iter_mut().zip(values) {
            *slot = value;
        }
    }

    SystemInfo {
        uptime_secs: payload.uptime.unwrap_or(0),
        users: payload.users.unwrap_or(0),
        processes: payload.processes.unwrap_or(0),
        load_average,
        ..SystemInfo::default()
    }
}

/// Builder for WebminAdapter.
#[derive(Debug, Default)]
pub struct WebminAdapterBuilder {
    endpoint: Option<String>,
    timeout: Option<Duration>,
}

impl WebminAdapterBuilder {
    /// Set the Webmin base URL (e.g., "http://localhost:10000").
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
    pub fn build(self) -> WebminAdapter {
        let timeout = self.timeout.unwrap_or(Duration::from_secs(10));

        let client = Client::builder()
            .timeout(timeout)
            .cookie_store(true)
            .build()
            .expect("Failed to build HTTP client");

        WebminAdapter {
            client,
            endpoint: self
                .endpoint
                .unwrap_or_else(|| "http://localhost:10000".to_string()),
        }
    }
}

/// Status payload from Webmin's sysinfo CGI.
#[derive(Debug, Default, Deserialize)]
struct WebminPayload {
    uptime: Option<u64>,
    users: Option<u32>,
    processes: Option<u32>,
    load: Option<Vec<f64>>,
}
