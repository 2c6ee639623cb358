//! # labwatch-adapters
//!
//! Pre-built adapters for collecting stats from the self-hosted services a
//! homelab dashboard typically watches.
//!
//! Each adapter fetches one third-party JSON API and normalizes the payload
//! into a `labwatch-types` stats shape. The payload-to-stats mapping is a
//! pure function in every adapter, so normalization rules are testable
//! without a live service.
//!
//! ## Supported Services
//!
//! - **Portainer** - container counts via the Docker endpoint API
//!   (API-key header auth)
//! - **Home Assistant** - entity counts per domain via `/api/states`
//!   (bearer token auth)
//! - **Cockpit** - host system info via `/cockpit/system/info`
//! - **Webmin** - uptime/users/processes via `sysinfo.cgi`
//! - Anything else - reachability only, via [`probe::StatusProbe`]
//!
//! ## Quick Start
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
//!     println!("{} running / {} total", stats.running, stats.total);
//!     Ok(())
//! }
//! ```

pub mod cockpit;
pub mod error;
pub mod homeassistant;
pub mod portainer;
pub mod probe;
pub mod webmin;

pub use error::AdapterError;

// Re-export the normalized shapes for convenience
pub use labwatch_types::{ContainerStats, EntityStats, SystemInfo};
