//! Array-backed binary heap with a caller-supplied ordering.
//!
//! Unlike `std::collections::BinaryHeap`, this heap exposes positions: any
//! element can be removed or re-prioritised in O(log n) given its index, and
//! the ordering is notified every time an element lands on a new index so
//! that index-tracking consumers (see [`LruCache`](crate::policy::lru::LruCache))
//! always know where their items live.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────────┐
//!   │                           Heap<T, O>                                 │
//!   │                                                                      │
//!   │   data: Vec<T>  (complete binary tree in array order)                │
//!   │                                                                      │
//!   │            [0]                 children(i) = 2i+1, 2i+2              │
//!   │           /   \                parent(i)   = (i-1)/2                 │
//!   │        [1]     [2]                                                   │
//!   │       /  \     /                                                     │
//!   │     [3]  [4] [5]                                                     │
//!   │                                                                      │
//!   │   order: O: HeapOrder<T>                                             │
//!   │     better(a, b)   → a sifts toward the root                         │
//!   │     placed(x, i)   → x now lives at data[i]  (default: no-op)        │
//!   └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Invariant: for every node `i` and each existing child `c`,
//! `!order.better(&data[c], &data[i])`. `data[0]` is therefore the best
//! element.
//!
//! ## Operations
//!
//! | Operation      | Description                                  | Complexity |
//! |----------------|----------------------------------------------|------------|
//! | `push`         | Append, sift up                              | O(log n)   |
//! | `pop`          | Take root, move last to root, sift down      | O(log n)   |
//! | `peek`         | Borrow root                                  | O(1)       |
//! | `remove(i)`    | Take `data[i]`, move last to `i`, re-sift    | O(log n)   |
//! | `fix(i)`       | Re-sift `data[i]` after its priority changed | O(log n)   |
//! | `repair`       | Bottom-up heapify                            | O(n)       |
//! | `from_vec`     | Take ownership of a vector and heapify       | O(n)       |
//!
//! ## Out-of-band mutation
//!
//! [`as_mut_slice`](Heap::as_mut_slice) and [`order_mut`](Heap::order_mut)
//! hand out mutable access to the backing storage and the ordering state.
//! After changing anything that affects `better`, call [`fix`](Heap::fix) on
//! the touched position (or [`repair`](Heap::repair) when more than one
//! position may be affected). Until then the results of `pop`, `peek` and
//! `remove` are unspecified.
//!
//! ## Example Usage
//!
//! ```
//! use heapcache::ds::{Heap, MinFirst};
//!
//! let mut heap = Heap::from_vec(vec![5, 1, 4, 2, 3], MinFirst);
//! heap.push(0);
//!
//! assert_eq!(heap.peek(), Some(&0));
//! assert_eq!(heap.pop(), Ok(0));
//!
//! // Re-prioritise an arbitrary element through the raw storage.
//! let pos = heap.as_slice().iter().position(|&x| x == 4).unwrap();
//! heap.as_mut_slice()[pos] = -1;
//! heap.fix(pos).unwrap();
//! assert_eq!(heap.pop(), Ok(-1));
//!
//! assert_eq!(heap.into_sorted_vec(), vec![1, 2, 3, 5]);
//! ```
//!
//! ## Thread Safety
//!
//! `Heap` is not thread-safe. Wrap in a mutex for concurrent access.

use std::fmt;

use crate::error::{HeapError, InvariantError};

/// Ordering used by [`Heap`].
///
/// `better` must be a strict total order: irreflexive, anticommutative and
/// transitive. Elements for which `better` holds sift toward the root.
///
/// Any `Fn(&T, &T) -> bool` closure is a `HeapOrder<T>`.
pub trait HeapOrder<T> {
    /// Returns `true` if `a` belongs above `b`.
    fn better(&self, a: &T, b: &T) -> bool;

    /// Called whenever `item` is written to position `index`.
    ///
    /// Implementations that track heap positions record `index` here.
    #[inline]
    fn placed(&mut self, item: &T, index: usize) {
        let _ = (item, index);
    }
}

impl<T, F> HeapOrder<T> for F
where
    F: Fn(&T, &T) -> bool,
{
    #[inline]
    fn better(&self, a: &T, b: &T) -> bool {
        self(a, b)
    }
}

/// Smallest element first, for any `T: Ord`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MinFirst;

impl<T: Ord> HeapOrder<T> for MinFirst {
    #[inline]
    fn better(&self, a: &T, b: &T) -> bool {
        a < b
    }
}

/// Largest element first, for any `T: Ord`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MaxFirst;

impl<T: Ord> HeapOrder<T> for MaxFirst {
    #[inline]
    fn better(&self, a: &T, b: &T) -> bool {
        a > b
    }
}

/// Binary heap over `Vec<T>` ordered by `O`.
///
/// # Type Parameters
///
/// - `T`: Element type
/// - `O`: Ordering (`HeapOrder<T>`); a closure, [`MinFirst`], [`MaxFirst`], or
///   a stateful ordering that looks elements up elsewhere
///
/// # Example
///
/// ```
/// use heapcache::ds::Heap;
///
/// // Longest string first.
/// let mut heap = Heap::by(|a: &String, b: &String| a.len() > b.len());
/// heap.push("ab".to_string());
/// heap.push("abcd".to_string());
/// heap.push("abc".to_string());
///
/// assert_eq!(heap.pop().unwrap(), "abcd");
/// assert_eq!(heap.len(), 2);
/// ```
#[derive(Clone)]
pub struct Heap<T, O> {
    data: Vec<T>,
    order: O,
}

impl<T, F> Heap<T, F>
where
    F: Fn(&T, &T) -> bool,
{
    /// Creates an empty heap ordered by the closure `better`.
    pub fn by(better: F) -> Self {
        Self::new(better)
    }

    /// Heapifies `data` under the closure `better`.
    pub fn from_vec_by(data: Vec<T>, better: F) -> Self {
        Self::from_vec(data, better)
    }
}

impl<T, O> Heap<T, O>
where
    O: HeapOrder<T>,
{
    /// Creates an empty heap.
    ///
    /// # Example
    ///
    /// ```
    /// use heapcache::ds::{Heap, MaxFirst};
    ///
    /// let heap: Heap<u8, MaxFirst> = Heap::new(MaxFirst);
    /// assert!(heap.is_empty());
    /// ```
    pub fn new(order: O) -> Self {
        Self {
            data: Vec::new(),
            order,
        }
    }

    /// Creates an empty heap with room for `capacity` elements.
    pub fn with_capacity(capacity: usize, order: O) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
            order,
        }
    }

    /// Takes ownership of `data` and heapifies it in O(n).
    ///
    /// # Example
    ///
    /// ```
    /// use heapcache::ds::{Heap, MaxFirst};
    ///
    /// let heap = Heap::from_vec(vec![3, 9, 1, 7], MaxFirst);
    /// assert_eq!(heap.peek(), Some(&9));
    /// assert!(heap.check_invariants().is_ok());
    /// ```
    pub fn from_vec(data: Vec<T>, order: O) -> Self {
        let mut heap = Self { data, order };
        heap.repair();
        heap
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    /// Returns the best element without removing it.
    #[inline]
    pub fn peek(&self) -> Option<&T> {
        self.data.first()
    }

    /// Inserts `item`, sifting it up while it is better than its parent.
    pub fn push(&mut self, item: T) {
        let index = self.data.len();
        self.data.push(item);
        self.announce(index);
        self.sift_up(index);
    }

    /// Removes and returns the best element.
    ///
    /// # Errors
    ///
    /// [`HeapError::Empty`] if the heap has no elements.
    ///
    /// # Example
    ///
    /// ```
    /// use heapcache::ds::{Heap, MinFirst};
    /// use heapcache::error::HeapError;
    ///
    /// let mut heap = Heap::from_vec(vec![2, 1], MinFirst);
    /// assert_eq!(heap.pop(), Ok(1));
    /// assert_eq!(heap.pop(), Ok(2));
    /// assert_eq!(heap.pop(), Err(HeapError::Empty));
    /// ```
    pub fn pop(&mut self) -> Result<T, HeapError> {
        if self.data.is_empty() {
            return Err(HeapError::Empty);
        }
        let item = self.data.swap_remove(0);
        if !self.data.is_empty() {
            self.announce(0);
            self.sift_down(0);
        }
        Ok(item)
    }

    /// Removes and returns the element at position `index`.
    ///
    /// The last element takes its place and is sifted down, or up if it did
    /// not move down.
    ///
    /// # Errors
    ///
    /// [`HeapError::IndexOutOfRange`] if `index >= len()`.
    ///
    /// # Example
    ///
    /// ```
    /// use heapcache::ds::{Heap, MinFirst};
    ///
    /// let mut heap = Heap::from_vec(vec![1, 2, 3, 4, 5], MinFirst);
    /// let pos = heap.as_slice().iter().position(|&x| x == 3).unwrap();
    /// assert_eq!(heap.remove(pos), Ok(3));
    /// assert_eq!(heap.into_sorted_vec(), vec![1, 2, 4, 5]);
    /// ```
    pub fn remove(&mut self, index: usize) -> Result<T, HeapError> {
        self.check_index(index)?;
        let item = self.data.swap_remove(index);
        if index < self.data.len() {
            self.announce(index);
            self.restore(index);
        }
        Ok(item)
    }

    /// Re-establishes the heap invariant at `index` after the priority of the
    /// element stored there changed.
    ///
    /// Calling `fix` where the invariant already holds leaves the heap
    /// unchanged.
    ///
    /// # Errors
    ///
    /// [`HeapError::IndexOutOfRange`] if `index >= len()`.
    pub fn fix(&mut self, index: usize) -> Result<(), HeapError> {
        self.check_index(index)?;
        self.restore(index);
        Ok(())
    }

    /// Re-heapifies the whole array in O(n) and re-announces every position.
    ///
    /// Use after bulk out-of-band mutation that may have broken the invariant
    /// at more than one position.
    pub fn repair(&mut self) {
        let len = self.data.len();
        for index in (0..len / 2).rev() {
            self.sift_down(index);
        }
        for index in 0..len {
            self.announce(index);
        }
    }

    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Borrows the backing storage in heap order.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Mutably borrows the backing storage.
    ///
    /// Call [`fix`](Self::fix) or [`repair`](Self::repair) after any change
    /// that affects ordering.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    #[inline]
    pub fn order(&self) -> &O {
        &self.order
    }

    /// Mutably borrows the ordering state.
    ///
    /// Same obligation as [`as_mut_slice`](Self::as_mut_slice): fix or repair
    /// whatever positions the change affects.
    #[inline]
    pub fn order_mut(&mut self) -> &mut O {
        &mut self.order
    }

    /// Returns the backing storage in heap (not sorted) order.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Drains the heap best-first.
    pub fn into_sorted_vec(mut self) -> Vec<T> {
        let mut sorted = Vec::with_capacity(self.data.len());
        while let Ok(item) = self.pop() {
            sorted.push(item);
        }
        sorted
    }

    /// Verifies that no element is better than its parent.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        for child in 1..self.data.len() {
            let parent = (child - 1) / 2;
            if self.order.better(&self.data[child], &self.data[parent]) {
                return Err(InvariantError::new(format!(
                    "heap element at {} is better than its parent at {}",
                    child, parent
                )));
            }
        }
        Ok(())
    }

    #[inline]
    fn check_index(&self, index: usize) -> Result<(), HeapError> {
        if index < self.data.len() {
            Ok(())
        } else {
            Err(HeapError::IndexOutOfRange {
                index,
                len: self.data.len(),
            })
        }
    }

    fn restore(&mut self, index: usize) {
        if !self.sift_down(index) {
            self.sift_up(index);
        }
    }

    /// Returns `true` if the element moved.
    fn sift_up(&mut self, start: usize) -> bool {
        let mut index = start;
        while index > 0 {
            let parent = (index - 1) / 2;
            if !self.order.better(&self.data[index], &self.data[parent]) {
                break;
            }
            self.swap(index, parent);
            index = parent;
        }
        index != start
    }

    /// Returns `true` if the element moved.
    fn sift_down(&mut self, start: usize) -> bool {
        let len = self.data.len();
        let mut index = start;
        loop {
            let left = 2 * index + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let child = if right < len && self.order.better(&self.data[right], &self.data[left]) {
                right
            } else {
                left
            };
            if !self.order.better(&self.data[child], &self.data[index]) {
                break;
            }
            self.swap(index, child);
            index = child;
        }
        index != start
    }

    #[inline]
    fn swap(&mut self, a: usize, b: usize) {
        self.data.swap(a, b);
        self.announce(a);
        self.announce(b);
    }

    #[inline]
    fn announce(&mut self, index: usize) {
        self.order.placed(&self.data[index], index);
    }
}

impl<T, O> Extend<T> for Heap<T, O>
where
    O: HeapOrder<T>,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.push(item);
        }
    }
}

impl<T, O> fmt::Debug for Heap<T, O>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Heap")
            .field("len", &self.data.len())
            .field("data", &self.data)
            .finish_non_exhaustive()
    }
}
