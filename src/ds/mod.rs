pub mod heap;
pub mod slot_arena;

pub use heap::{Heap, HeapOrder, MaxFirst, MinFirst};
pub use slot_arena::{SlotArena, SlotId};
