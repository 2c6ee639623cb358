//! Generic reachability probe for services without a stats API.
//!
//! Sends a single `HEAD` request per check. Any response at all counts as
//! online - auth walls and redirects still prove the service is up - and
//! only a transport failure counts as offline.

use std::time::{Duration, SystemTime};

use reqwest::Client;

/// Result of one reachability check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeResult {
    pub online: bool,
    pub checked_at: SystemTime,
}

/// A best-effort reachability probe for a single URL.
#[derive(Debug, Clone)]
pub struct StatusProbe {
    client: Client,
    url: String,
}

impl StatusProbe {
    /// Create a probe for the given URL with the default 5 second timeout.
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_timeout(url, Duration::from_secs(5))
    }

    /// Create a probe with a custom timeout.
    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build HTTP client");

        Self { client, url: url.into() }
    }

    /// The URL being probed.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Perform one check. Never fails; unreachable simply means offline.
    pub async fn check(&self) -> ProbeResult {
        let online = self.client.head(&self.url).send().await.is_ok();
        ProbeResult { online, checked_at: SystemTime::now() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_url() {
        let probe = StatusProbe::new("http://nas.local:5000");
        assert_eq!(probe.url(), "http://nas.local:5000");
    }

    #[tokio::test]
    async fn test_unreachable_is_offline_not_error() {
        // Nothing listens on port 1; the probe reports offline instead of
        // propagating the connection error.
        let probe = StatusProbe::with_timeout("http://127.0.0.1:1", Duration::from_millis(200));
        let result = probe.check().await;
        assert!(!result.online);
    }

    #[tokio::test]
    async fn test_reachable_is_online() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        // Minimal HTTP responder; status code doesn't matter for the probe
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            if let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = [0u8; 1024];
                let _ = socket.read(&mut buf).await;
                let _ = socket
                    .write_all(b"HTTP/1.1 401 Unauthorized\r\ncontent-length: 0\r\n\r\n")
                    .await;
            }
        });

        let probe = StatusProbe::new(format!("http://{}", addr));
        let result = probe.check().await;
        assert!(result.online);
    }
}
