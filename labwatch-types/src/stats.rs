//! Normalized stats shapes produced by the service adapters.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Container counts from a container manager.
///
/// `total` is always derived from the two partitions, never fetched as an
/// independent field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContainerStats {
    /// Containers whose state is the running sentinel.
    pub running: u64,
    /// Everything else (exited, created, paused, ...).
    pub stopped: u64,
    /// Always `running + stopped`.
    pub total: u64,
}

impl ContainerStats {
    /// Build stats from the two partitions, deriving the total.
    pub fn from_counts(running: u64, stopped: u64) -> Self {
        Self { running, stopped, total: running + stopped }
    }

    /// Check the derived-total invariant. Holds for any value built through
    /// `from_counts`; useful when deserializing foreign data.
    pub fn is_consistent(&self) -> bool {
        self.running + self.stopped == self.total
    }
}

/// Entity counts from a smart-home hub, grouped by domain.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EntityStats {
    /// Total number of entities.
    pub entities: u64,
    /// Entity count per domain (the prefix before the first `.` in the
    /// entity id).
    pub domains: BTreeMap<String, u64>,
}

impl EntityStats {
    /// The domain of an entity identifier.
    ///
    /// Ids without a separator count under the whole id.
    pub fn domain_of(entity_id: &str) -> &str {
        entity_id.split('.').next().unwrap_or(entity_id)
    }

    /// Count one entity under its domain.
    pub fn record(&mut self, entity_id: &str) {
        self.entities += 1;
        *self.domains.entry(Self::domain_of(entity_id).to_string()).or_insert(0) += 1;
    }

    /// Check that domain counts sum to the entity total.
    pub fn is_consistent(&self) -> bool {
        self.domains.values().sum::<u64>() == self.entities
    }
}

/// Normalized system information from a system-admin panel.
///
/// Different vendors report different subsets; missing fields keep their
/// neutral defaults instead of failing the fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemInfo {
    pub hostname: String,
    pub os: String,
    pub kernel: String,
    pub cpu_count: u32,
    /// Total memory in bytes.
    pub memory_total: u64,
    /// Used memory in bytes.
    pub memory_used: u64,
    /// 1/5/15 minute load averages.
    pub load_average: [f64; 3],
    pub uptime_secs: u64,
    /// Logged-in user sessions.
    pub users: u32,
    pub processes: u32,
}

impl Default for SystemInfo {
    fn default() -> Self {
        Self {
            hostname: "Unknown".to_string(),
            os: "Unknown".to_string(),
            kernel: "Unknown".to_string(),
            cpu_count: 0,
            memory_total: 0,
            memory_used: 0,
            load_average: [0.0; 3],
            uptime_secs: 0,
            users: 0,
            processes: 0,
        }
    }
}

/// Union of the normalized shapes, for card-level consumers that hold
/// "whatever this service reported last".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind")]
pub enum ServiceStats {
    Containers(ContainerStats),
    Entities(EntityStats),
    System(SystemInfo),
}
