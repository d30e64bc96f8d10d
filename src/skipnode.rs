use std::iter;

// /////////////////////////////////////////////////////////////////////////////////////////////////
// SkipNode
// /////////////////////////////////////////////////////////////////////////////////////////////////

/// Handle of a node inside the skiplist arena.
pub type NodeId = usize;

/// The header always occupies the first slot of the arena.
pub const HEAD: NodeId = 0;

/// SkipNodes make up the SkipList.  They live in an arena owned by the list and refer to each
/// other by `NodeId`, so a link is never ownership: the list owns every node, and the level-0
/// chain alone decides which of them are part of the structure.
///
/// `links[i]` is the next node at level `i`, or `None` if this is the last node at that level.
#[derive(Clone, Debug)]
pub struct SkipNode<K, V> {
    // key and value are only None for the head node and for vacated slots.
    pub key: Option<K>,
    pub value: Option<V>,
    // The length is the node's level plus one, or the total number of levels for the head.
    pub links: Vec<Option<NodeId>>,
}

impl<K, V> SkipNode<K, V> {
    /// Create a new head node.
    pub fn head(total_levels: usize) -> Self {
        SkipNode {
            key: None,
            value: None,
            links: iter::repeat(None).take(total_levels).collect(),
        }
    }

    /// Create a new SkipNode reaching up to `level`.  Its links are all `None` and have to be
    /// spliced in.
    pub fn new(key: K, value: V, level: usize) -> Self {
        SkipNode {
            key: Some(key),
            value: Some(value),
            links: iter::repeat(None).take(level + 1).collect(),
        }
    }

    /// A slot that held a node which has since been removed.
    pub fn vacant() -> Self {
        SkipNode {
            key: None,
            value: None,
            links: vec![],
        }
    }

    /// The highest level this node takes part in.
    #[cfg(test)]
    pub fn level(&self) -> usize {
        self.links.len() - 1
    }

    /// Consumes the node returning the pair it contains.
    pub fn into_inner(self) -> Option<(K, V)> {
        match (self.key, self.value) {
            (Some(k), Some(v)) => Some((k, v)),
            _ => None,
        }
    }
}
