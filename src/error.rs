//! Error types for the heapcache library.
//!
//! ## Key Components
//!
//! - [`HeapError`]: Returned by [`Heap`](crate::ds::Heap) operations that
//!   address an element which does not exist (pop on an empty heap, fix or
//!   remove outside `[0, len)`).
//! - [`ConfigError`]: Returned when cache configuration parameters are invalid
//!   (e.g. zero capacity).
//! - [`InvariantError`]: Returned when internal data-structure invariants are
//!   violated (`check_invariants` methods).
//!
//! Cache operations themselves never fail; absence is reported as `None`.
//!
//! ## Example Usage
//!
//! ```
//! use heapcache::ds::{Heap, MinFirst};
//! use heapcache::error::HeapError;
//!
//! let mut heap: Heap<u32, MinFirst> = Heap::new(MinFirst);
//! assert_eq!(heap.pop(), Err(HeapError::Empty));
//!
//! heap.push(7);
//! assert_eq!(heap.fix(3), Err(HeapError::IndexOutOfRange { index: 3, len: 1 }));
//! ```

use std::fmt;

// ---------------------------------------------------------------------------
// HeapError
// ---------------------------------------------------------------------------

/// Error returned by heap operations on a missing element.
///
/// Both variants signal a caller bookkeeping bug rather than a transient
/// condition; there is nothing to retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeapError {
    /// `pop` was called on a heap of length 0.
    Empty,
    /// `remove` or `fix` was called with a position outside `[0, len)`.
    IndexOutOfRange { index: usize, len: usize },
}

impl fmt::Display for HeapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeapError::Empty => f.write_str("pop from an empty heap"),
            HeapError::IndexOutOfRange { index, len } => {
                write!(f, "heap index {} out of range for length {}", index, len)
            },
        }
    }
}

impl std::error::Error for HeapError {}

// ---------------------------------------------------------------------------
// InvariantError
// ---------------------------------------------------------------------------

/// Inconsistent internal state found by a `check_invariants` call on a
/// [`Heap`](crate::ds::Heap::check_invariants) or an
/// [`LruCache`](crate::policy::lru::LruCache::check_invariants).
///
/// The message names the structure and position that disagree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError(String);

impl InvariantError {
    #[inline]
    pub fn new(detail: impl Into<String>) -> Self {
        Self(detail.into())
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invariant violated: {}", self.0)
    }
}

impl std::error::Error for InvariantError {}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Rejected construction parameter, from
/// [`LruCache::try_new`](crate::policy::lru::LruCache::try_new).
///
/// # Example
///
/// ```
/// use heapcache::policy::lru::LruCache;
///
/// let err = LruCache::<u64, u64>::try_new(0).unwrap_err();
/// assert!(err.message().contains("capacity"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError(String);

impl ConfigError {
    #[inline]
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid configuration: {}", self.0)
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
