//! # Metrics Trait Hierarchy
//!
//! Separates *recording*, *snapshotting* and *export* into small traits so
//! cache logic never depends on how counters are consumed.
//!
//! ```text
//!              ┌─────────────────────────────┐
//!              │     CoreMetricsRecorder     │
//!              │  get_hit/get_miss/insert    │
//!              │  evict/clear                │
//!              └──────────────┬──────────────┘
//!                             │
//!                             ▼
//!              ┌─────────────────────────────┐     ┌──────────────────────────┐
//!              │     LruMetricsRecorder      │     │  LruMetricsReadRecorder  │
//!              │  pop_lru/touch/remove/fix   │     │  peek_lru/recency_rank   │
//!              └─────────────────────────────┘     └──────────────────────────┘
//!
//!   Consumption:
//!   ┌──────────────────────────────┐    ┌──────────────────────────────┐
//!   │ MetricsSnapshotProvider<S>   │    │ MetricsExporter<S>           │
//!   │ (bench/test)                 │    │ (production monitoring)      │
//!   └──────────────────────────────┘    └──────────────────────────────┘
//! ```

/// Common counters for any cache policy.
pub trait CoreMetricsRecorder {
    fn record_get_hit(&mut self);
    fn record_get_miss(&mut self);
    fn record_insert_call(&mut self);
    fn record_insert_new(&mut self);
    fn record_insert_update(&mut self);
    fn record_evict_call(&mut self);
    fn record_evicted_entry(&mut self);
    fn record_clear(&mut self);
}

/// Metrics for LRU behavior on `&mut self` paths.
pub trait LruMetricsRecorder: CoreMetricsRecorder {
    fn record_pop_lru_call(&mut self);
    fn record_pop_lru_found(&mut self);
    fn record_touch_call(&mut self);
    fn record_touch_found(&mut self);
    fn record_remove_call(&mut self);
    fn record_remove_found(&mut self);
    /// An age-heap position was re-sifted after its epoch changed.
    fn record_heap_fix(&mut self);
}

/// Read-only LRU metrics for `&self` methods (uses interior mutability).
pub trait LruMetricsReadRecorder {
    fn record_peek_lru_call(&self);
    fn record_peek_lru_found(&self);
    fn record_recency_rank_call(&self);
    fn record_recency_rank_found(&self);
    fn record_recency_rank_scan_step(&self);
}

/// Produce a point-in-time copy of a cache's counters.
pub trait MetricsSnapshotProvider<S> {
    fn snapshot(&self) -> S;
}

/// Export/publish metrics to monitoring backends.
pub trait MetricsExporter<S> {
    fn export(&self, snapshot: &S);
}
