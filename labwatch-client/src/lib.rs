//! # labwatch-client
//!
//! The data-refresh runtime behind a homelab status dashboard: timed
//! pollers with tri-state results, rolling metric history for charts, and
//! a filtered subscriber for the live-log stream.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use labwatch_adapters::portainer::PortainerAdapter;
//! use labwatch_client::{LogStream, PollHandle};
//!
//! #[tokio::main]
//! async fn main() {
//!     // Poll container counts every 30 seconds
//!     let adapter = PortainerAdapter::builder()
//!         .endpoint("http://localhost:9000")
//!         .token("ptr_secret")
//!         .build();
//!     let poller = PollHandle::spawn(
//!         move || {
//!             let adapter = adapter.clone();
//!             async move { adapter.collect().await }
//!         },
//!         Duration::from_secs(30),
//!     );
//!
//!     // Follow the portainer log stream
//!     let logs = LogStream::connect("ws://localhost:3001/ws", "portainer");
//!
//!     // ... render poller.state() and logs.logs() ...
//!     # let _ = (poller, logs);
//! }
//! ```
//!
//! ## Design
//!
//! - **Pollers never stop on error**: a failed cycle records the error and
//!   the next tick retries; recovery is automatic.
//! - **Whole-state updates**: consumers see loading, data, or error -
//!   never a blend of two cycles.
//! - **Explicit reconnects**: the log stream has no auto-reconnect; a
//!   dropped connection surfaces as `Disconnected` and the owner decides.

pub mod config;
pub mod metrics;
pub mod poller;
pub mod subscriber;

pub use config::Settings;
pub use metrics::MetricsHistory;
pub use poller::{PollHandle, PollState};
pub use subscriber::{ConnectionState, LogStream, DEFAULT_LOG_CAPACITY};
