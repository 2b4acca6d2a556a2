pub use crate::ds::{Heap, HeapOrder, MaxFirst, MinFirst, SlotArena, SlotId};
pub use crate::error::{ConfigError, HeapError, InvariantError};

#[cfg(feature = "metrics")]
pub use crate::metrics::snapshot::LruMetricsSnapshot;
pub use crate::policy::lru::LruCache;
pub use crate::traits::{CoreCache, LruCacheTrait, MutableCache};
