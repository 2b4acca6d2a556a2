//! Feature-gated cache metrics.
//!
//! Recording is split from consumption: caches write counters through the
//! recorder traits, callers read them back through
//! [`MetricsSnapshotProvider`](traits::MetricsSnapshotProvider) and publish
//! them with a [`MetricsExporter`](traits::MetricsExporter).

pub mod cell;
pub mod exporter;
pub mod metrics_impl;
pub mod snapshot;
pub mod traits;
