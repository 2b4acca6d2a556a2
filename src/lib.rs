//! heapcache: an index-tracking binary heap and a bounded LRU cache built on it.
//!
//! - [`ds::heap`]: array-backed heap with a caller-supplied ordering, O(log n)
//!   removal and re-prioritisation at any position.
//! - [`policy::lru`]: fixed-capacity LRU cache whose recency order lives in a
//!   heap keyed by a logical clock.
//! - [`metrics`] (feature `metrics`): counters, snapshots and a Prometheus
//!   text exporter.

pub mod ds;
pub mod error;
pub mod policy;

#[cfg(feature = "metrics")]
pub mod metrics;

pub mod prelude;
pub mod traits;
