//! An ordered key-value container backed by a skiplist.  Insertion, lookup and removal are all
//! done in `O(log(n))` on average, without any of the rebalancing of a balanced tree.
//!
//! Conceptually, a skiplist resembles something like:
//!
//! ```text
//! <head> ----------> [2] --------------------------------------------------> [9] ---------->
//! <head> ----------> [2] ------------------------------------[7] ----------> [9] ---------->
//! <head> ----------> [2] ----------> [4] ------------------> [7] ----------> [9] --> [10] ->
//! <head> --> [1] --> [2] --> [3] --> [4] --> [5] --> [6] --> [7] --> [8] --> [9] --> [10] ->
//! ```
//!
//! where each node `[x]` has links to nodes further down the list, allowing a search to skip
//! ahead.  The bottom level holds every node; each level above holds a random subset of the one
//! below, as decided by a `LevelGenerator`.
//!
//! The list is ordered by a `Comparator` which **must** be well-behaved.  Given some ordering
//! function `f(a, b)`, it must satisfy the following properties:
//!
//! - Be well defined: `f(a, b)` should always return the same value
//! - Be anti-symmetric: `f(a, b) == Greater` iff `f(b, a) == Less` and `f(a, b) == Equal == f(b, a)`.
//! - Be transitive: If `f(a, b) == Greater` and `f(b, c) == Greater` then `f(a, c) == Greater`.
//!
//! **Failure to satisfy these properties will silently corrupt the ordering of the list.**
//!
//! The list does no locking of its own.  Wrap it in a `Mutex` or `RwLock` to share it between
//! threads.

pub mod comparator;
pub mod error;
pub mod level_generator;
pub mod skiplist;
mod skipnode;

pub use crate::comparator::{Comparator, NaturalOrder};
pub use crate::error::SkipListError;
pub use crate::level_generator::{GeometricalLevelGenerator, LevelGenerator, RandomSource, MAX_LEVEL};
pub use crate::skiplist::{Iter, SkipList};
