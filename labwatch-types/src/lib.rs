//! # labwatch-types
//!
//! Core types for homelab dashboard data synchronization. This crate defines
//! the schema shared between collectors, the refresh runtime, and any
//! presentation layer sitting on top of them.
//!
//! ## Design Goals
//!
//! - **Pure data**: No I/O, no async - just the shapes that flow through the
//!   system
//! - **Serde everywhere**: Every type round-trips through the JSON the
//!   dashboard's collaborators actually speak
//! - **Backend agnostic**: Stats shapes are normalized; nothing here knows
//!   which panel a payload came from
//!
//! ## Example
//!
//! ```rust
//! use labwatch_types::{HistorySeries, ContainerStats};
//!
//! // A normalized container count, total always derived
//! let stats = ContainerStats::from_counts(4, 2);
//! assert_eq!(stats.total, 6);
//!
//! // A chart series keeps only the most recent samples
//! let mut series = HistorySeries::new(20);
//! series.record(1700000000000, 6.0);
//! assert_eq!(series.len(), 1);
//! ```

mod history;
mod log;
mod service;
mod stats;

pub use history::*;
pub use log::*;
pub use service::*;
pub use stats::*;
