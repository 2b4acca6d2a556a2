use std::cell::Cell;

/// Counter that can be bumped through `&self`.
///
/// Used for read paths (`peek_lru`, `recency_rank`) that only borrow the
/// cache immutably.
/// `MetricsCell` is `Send` but not `Sync`, so a cache holding one can move
/// between threads inside a `Mutex` but never be read concurrently.
#[repr(transparent)]
#[derive(Debug, Default)]
pub struct MetricsCell(Cell<u64>);

impl MetricsCell {
    #[inline]
    pub fn new() -> Self {
        Self(Cell::new(0))
    }

    #[inline]
    pub fn get(&self) -> u64 {
        self.0.get()
    }

    #[inline]
    pub fn incr(&self) {
        self.0.set(self.0.get().saturating_add(1));
    }

    #[inline]
    pub fn reset(&self) {
        self.0.set(0);
    }
}
