//! Service descriptors - which backends the dashboard watches.

use serde::{Deserialize, Serialize};

/// The API family a service speaks.
///
/// Determines which adapter is used to normalize the service's payloads.
/// `Generic` services get no stats adapter, only a reachability probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiKind {
    /// Portainer container manager (API-key header auth).
    Portainer,
    /// Home Assistant smart-home hub (bearer token auth).
    #[serde(rename = "homeassistant")]
    HomeAssistant,
    /// Cockpit system panel (cookie/session auth).
    Cockpit,
    /// Webmin system panel (cookie/session auth).
    Webmin,
    /// Usermin user panel.
    Usermin,
    /// Anything else - probed for reachability only.
    #[default]
    Generic,
}

/// One watched service, as created by the setup flow and persisted in the
/// external config store.
///
/// Adapters treat descriptors as read-only input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceDescriptor {
    /// Stable identifier, also the subscription key for the log stream.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Base URL of the service (scheme + host + port).
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Which adapter family applies.
    ///
    /// The store uses camelCase keys; the aliases accept the snake_case
    /// and lowercased spellings settings files produce.
    #[serde(default, rename = "apiType", alias = "api_type", alias = "apitype")]
    pub api_kind: ApiKind,
    /// Credential for API-based adapters, if configured.
    #[serde(
        default,
        rename = "apiToken",
        alias = "api_token",
        alias = "apitoken",
        skip_serializing_if = "Option::is_none"
    )]
    pub api_token: Option<String>,
}

impl ServiceDescriptor {
    /// Create a descriptor with just the required fields.
    pub fn new(id: impl Into<String>, name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            url: url.into(),
            description: None,
            icon: None,
            api_kind: ApiKind::Generic,
            api_token: None,
        }
    }

    /// Whether a credential is configured for this service.
    pub fn has_token(&self) -> bool {
        self.api_token.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// The configured credential, if any.
    pub fn token(&self) -> Option<&str> {
        self.api_token.as_deref().filter(|t| !t.is_empty())
    }
}

/// The configuration blob the external config store persists.
///
/// The store itself (HTTP GET/POST, file vs. memory) is a collaborator
/// outside this core; only the shape is defined here.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// The services the dashboard watches.
    #[serde(default)]
    pub services: Vec<ServiceDescriptor>,
    /// Whether the setup flow has completed at least once.
    #[serde(default, rename = "setupComplete", alias = "setup_complete", alias = "setupcomplete")]
    pub setup_complete: bool,
}

impl DashboardConfig {
    /// Look up a service by its identifier.
    pub fn service(&self, id: &str) -> Option<&ServiceDescriptor> {
        self.services.iter().find(|s| s.id == id)
    }
}
