//! The skiplist proper: an ordered map whose nodes live in an arena and link to each other by
//! index.
//!
//! Every operation walks the same path.  Starting at the head on the highest populated level, it
//! moves forward while the next key is smaller than the target and drops down a level when the
//! next key would overshoot.  The last node visited on each level is the one a new node gets
//! spliced in after, or the one whose link has to be redirected when a node is removed.

use std::cmp::{self, Ordering};
use std::fmt;
use std::iter;
use std::mem;

use config::Config;
use logger::{log, Logger};

use crate::comparator::{Comparator, NaturalOrder};
use crate::error::SkipListError;
use crate::level_generator::{GeometricalLevelGenerator, LevelGenerator, MAX_LEVEL};
use crate::skipnode::{NodeId, SkipNode, HEAD};

// /////////////////////////////////////////////////////////////////////////////////////////////////
// SkipList
// /////////////////////////////////////////////////////////////////////////////////////////////////

/// An ordered map with expected `O(log(n))` search, insertion and removal.
///
/// Keys are kept sorted by the list's `Comparator` and each key appears at most once: inserting
/// an existing key replaces its value.  Mutable references to keys are not available at all as this
/// could leave a node out of order.
///
/// Levels come from `G`, a geometric generator seeded from the operating system unless another
/// `LevelGenerator` is given to `with_generator`.
pub struct SkipList<K, V, C = NaturalOrder, G = GeometricalLevelGenerator> {
    // Storage, slot `HEAD` is the head.  This is not sorted.
    nodes: Vec<SkipNode<K, V>>,
    // Vacated slots, reused by later insertions.
    free: Vec<NodeId>,
    // Highest level with at least one node, or 0 when empty.
    level: usize,
    len: usize,
    comparator: C,
    level_generator: G,
    logger: Option<Logger>,
}

// ///////////////////////////////////////////////
// Inherent methods
// ///////////////////////////////////////////////

impl<K: Ord, V> SkipList<K, V, NaturalOrder> {
    /// Create a new skiplist with `max_level` levels, ordered by `K`'s `Ord` and with levels
    /// drawn from an operating system seeded generator.
    ///
    /// # Examples
    ///
    /// ```
    /// use skiplist::SkipList;
    ///
    /// let mut list: SkipList<Vec<u8>, Vec<u8>> = SkipList::new(8).unwrap();
    /// list.insert(b"foo".to_vec(), b"bar".to_vec());
    /// assert_eq!(list.search(&b"foo".to_vec()), Some(&b"bar".to_vec()));
    /// ```
    pub fn new(max_level: usize) -> Result<Self, SkipListError> {
        Self::with_comparator(max_level, NaturalOrder)
    }

    /// Create a new skiplist from the level settings of `config`.
    pub fn from_config(config: &Config) -> Result<Self, SkipListError> {
        let lg = GeometricalLevelGenerator::with_probability(config.maxlevel, config.probability)?;
        Self::with_generator(NaturalOrder, lg)
    }
}

impl<K, V, C: Comparator<K>> SkipList<K, V, C> {
    /// Create a new skiplist with `max_level` levels ordered by `comparator`.
    ///
    /// # Examples
    ///
    /// ```
    /// use skiplist::SkipList;
    ///
    /// let mut list = SkipList::with_comparator(8, |a: &u32, b: &u32| b.cmp(a)).unwrap();
    /// list.insert(1, "one");
    /// list.insert(2, "two");
    /// assert_eq!(list.iter().map(|(k, _)| *k).collect::<Vec<_>>(), vec![2, 1]);
    /// ```
    pub fn with_comparator(max_level: usize, comparator: C) -> Result<Self, SkipListError> {
        let lg = GeometricalLevelGenerator::new(max_level)?;
        Self::with_generator(comparator, lg)
    }
}

impl<K, V, C: Comparator<K>, G: LevelGenerator> SkipList<K, V, C, G> {
    /// Create a new skiplist with as many levels as `level_generator.total()`, which must be in
    /// `1..=MAX_LEVEL`.  Levels the generator hands out past the top one are clamped to it.
    ///
    /// # Examples
    ///
    /// ```
    /// use skiplist::{LevelGenerator, NaturalOrder, SkipList};
    ///
    /// struct Flat;
    ///
    /// impl LevelGenerator for Flat {
    ///     fn random(&mut self) -> usize { 0 }
    ///     fn total(&self) -> usize { 1 }
    /// }
    ///
    /// let mut list = SkipList::with_generator(NaturalOrder, Flat).unwrap();
    /// list.insert(2, "b");
    /// list.insert(1, "a");
    /// assert_eq!(list.level(), 0);
    /// assert_eq!(list.iter().map(|(k, _)| *k).collect::<Vec<_>>(), vec![1, 2]);
    /// ```
    pub fn with_generator(comparator: C, level_generator: G) -> Result<Self, SkipListError> {
        let total = level_generator.total();
        if total == 0 || total > MAX_LEVEL {
            return Err(SkipListError::InvalidMaxLevel(total));
        }
        Ok(SkipList {
            nodes: vec![SkipNode::head(level_generator.total())],
            free: vec![],
            level: 0,
            len: 0,
            comparator,
            level_generator,
            logger: None,
        })
    }

    /// Report structural changes (the list growing or shrinking a level) to `logger`.
    pub fn set_logger(&mut self, logger: Logger) {
        self.logger = Some(logger);
    }

    /// Whether node `id` comes strictly before `key`.
    #[inline]
    fn precedes(&self, id: NodeId, key: &K) -> bool {
        match self.nodes[id].key {
            Some(ref k) => self.comparator.compare(k, key) == Ordering::Less,
            None => false,
        }
    }

    /// Whether node `id` holds exactly `key`.
    #[inline]
    fn matches(&self, id: NodeId, key: &K) -> bool {
        match self.nodes[id].key {
            Some(ref k) => self.comparator.compare(k, key) == Ordering::Equal,
            None => false,
        }
    }

    /// Walks from the head down to level 0 looking for `key`.  `visit(lvl, node)` is called with
    /// the last node on each level that precedes `key`.  Returns the first node whose key is not
    /// smaller than `key`, if any.
    fn seek<F>(&self, key: &K, mut visit: F) -> Option<NodeId>
    where
        F: FnMut(usize, NodeId),
    {
        let mut node = HEAD;
        for lvl in (0..=self.level).rev() {
            while let Some(next) = self.nodes[node].links[lvl] {
                if !self.precedes(next, key) {
                    break;
                }
                node = next;
            }
            visit(lvl, node);
        }
        self.nodes[node].links[0]
    }

    /// Looks `key` up, returning its value if present.
    ///
    /// # Examples
    ///
    /// ```
    /// use skiplist::SkipList;
    ///
    /// let mut list = SkipList::new(2).unwrap();
    /// list.insert("foo", "bar");
    /// assert_eq!(list.search(&"foo"), Some(&"bar"));
    /// assert_eq!(list.search(&"baz"), None);
    /// ```
    pub fn search(&self, key: &K) -> Option<&V> {
        let candidate = self.seek(key, |_, _| ())?;
        if self.matches(candidate, key) {
            self.nodes[candidate].value.as_ref()
        } else {
            None
        }
    }

    /// Returns `true` if `key` is in the list.
    pub fn contains_key(&self, key: &K) -> bool {
        self.search(key).is_some()
    }

    /// Insert `value` under `key`.  If the key was already present its value is replaced in
    /// place and the old one returned; no node is added and no level changes.
    ///
    /// # Examples
    ///
    /// ```
    /// use skiplist::SkipList;
    ///
    /// let mut list = SkipList::new(8).unwrap();
    /// assert_eq!(list.insert(1, "Hello"), None);
    /// assert_eq!(list.insert(1, "World"), Some("Hello"));
    /// assert_eq!(list.len(), 1);
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        // `update[lvl]` is the node the new one goes after on level `lvl`.  Levels above the
        // current one start out pointing at the head.
        let mut update = vec![HEAD; self.max_level()];
        let candidate = self.seek(&key, |lvl, node| update[lvl] = node);
        if let Some(existing) = candidate.filter(|&id| self.matches(id, &key)) {
            return mem::replace(&mut self.nodes[existing].value, Some(value));
        }

        let level = cmp::min(self.level_generator.random(), self.max_level() - 1);
        if level > self.level {
            if let Some(ref logger) = self.logger {
                log!(logger, Debug, "skiplist level raised from {} to {}", self.level, level);
            }
            self.level = level;
        }

        let id = self.alloc(SkipNode::new(key, value, level));
        for (lvl, &prev) in update.iter().enumerate().take(level + 1) {
            self.nodes[id].links[lvl] = self.nodes[prev].links[lvl];
            self.nodes[prev].links[lvl] = Some(id);
        }
        self.len += 1;
        None
    }

    /// Remove `key` from the list, returning `true` if it was present.
    ///
    /// # Examples
    ///
    /// ```
    /// use skiplist::SkipList;
    ///
    /// let mut list = SkipList::new(8).unwrap();
    /// list.insert(1u64, "testing");
    /// assert!(list.delete(&1));
    /// assert!(!list.delete(&1));
    /// assert!(list.search(&1).is_none());
    /// ```
    pub fn delete(&mut self, key: &K) -> bool {
        self.remove(key).is_some()
    }

    /// Remove `key` from the list, returning its value if it was present.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let mut update = vec![HEAD; self.max_level()];
        let target = self
            .seek(key, |lvl, node| update[lvl] = node)
            .filter(|&id| self.matches(id, key))?;

        for lvl in 0..=self.level {
            let prev = update[lvl];
            // the node takes part in every level below its own and none above
            if self.nodes[prev].links[lvl] != Some(target) {
                break;
            }
            self.nodes[prev].links[lvl] = self.nodes[target].links[lvl];
        }

        let level = self.level;
        while self.level > 0 && self.nodes[HEAD].links[self.level].is_none() {
            self.level -= 1;
        }
        if self.level != level {
            if let Some(ref logger) = self.logger {
                log!(logger, Debug, "skiplist level shrunk from {} to {}", level, self.level);
            }
        }

        self.len -= 1;
        let node = mem::replace(&mut self.nodes[target], SkipNode::vacant());
        self.free.push(target);
        node.into_inner().map(|(_, v)| v)
    }
}

impl<K, V, C, G> SkipList<K, V, C, G> {
    fn alloc(&mut self, node: SkipNode<K, V>) -> NodeId {
        match self.free.pop() {
            Some(id) => {
                self.nodes[id] = node;
                id
            }
            None => {
                self.nodes.push(node);
                self.nodes.len() - 1
            }
        }
    }

    /// Removes every element.  The level generator and comparator are kept.
    pub fn clear(&mut self) {
        let total = self.max_level();
        self.nodes.clear();
        self.nodes.push(SkipNode::head(total));
        self.free.clear();
        self.level = 0;
        self.len = 0;
        if let Some(ref logger) = self.logger {
            log!(logger, Debug, "skiplist cleared");
        }
    }

    /// Returns the number of elements in the list.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the list contains no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The highest level currently holding a node; 0 for an empty list.
    #[inline]
    pub fn level(&self) -> usize {
        self.level
    }

    /// The number of levels the list was created with.  Nodes reach at most `max_level() - 1`.
    #[inline]
    pub fn max_level(&self) -> usize {
        self.nodes[HEAD].links.len()
    }

    /// Iterates over the pairs in key order.
    ///
    /// # Examples
    ///
    /// ```
    /// use skiplist::SkipList;
    ///
    /// let mut list = SkipList::new(4).unwrap();
    /// list.extend(vec![(3, 'c'), (1, 'a'), (2, 'b')]);
    /// assert_eq!(list.iter().collect::<Vec<_>>(), vec![(&1, &'a'), (&2, &'b'), (&3, &'c')]);
    /// ```
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            nodes: &self.nodes,
            next: self.nodes[HEAD].links[0],
            remaining: self.len,
        }
    }
}

// ///////////////////////////////////////////////
// Trait implementation
// ///////////////////////////////////////////////

impl<K, V, C: Comparator<K>, G: LevelGenerator> Extend<(K, V)> for SkipList<K, V, C, G> {
    /// Inserts every pair, replacing the values of keys already present.
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iterable: I) {
        for (k, v) in iterable {
            self.insert(k, v);
        }
    }
}

impl<'a, K, V, C, G> IntoIterator for &'a SkipList<K, V, C, G> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C, G> fmt::Debug for SkipList<K, V, C, G> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: fmt::Display, V: fmt::Display, C, G> fmt::Display for SkipList<K, V, C, G> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[")?;
        for (i, (k, v)) in self.iter().enumerate() {
            if i != 0 {
                write!(f, ", ")?;
            }
            write!(f, "({}, {})", k, v)?;
        }
        write!(f, "]")
    }
}

// /////////////////////////////////////////////////////////////////////////////////////////////////
// Iterator
// /////////////////////////////////////////////////////////////////////////////////////////////////

/// Walks the level-0 chain of a `SkipList`.
pub struct Iter<'a, K, V> {
    nodes: &'a [SkipNode<K, V>],
    next: Option<NodeId>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<(&'a K, &'a V)> {
        let nodes: &'a [SkipNode<K, V>] = self.nodes;
        let node = &nodes[self.next?];
        self.next = node.links[0];
        self.remaining -= 1;
        match (node.key.as_ref(), node.value.as_ref()) {
            (Some(k), Some(v)) => Some((k, v)),
            _ => None,
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K, V> ExactSizeIterator for Iter<'a, K, V> {}

impl<'a, K, V> iter::FusedIterator for Iter<'a, K, V> {}

// /////////////////////////////////////////////////////////////////////////////////////////////////
// Tests
// /////////////////////////////////////////////////////////////////////////////////////////////////
