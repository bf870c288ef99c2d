//! Identity-stable node cache.
//!
//! Lookups take the shard's shared lock; a miss re-checks under the shard's
//! exclusive lock before constructing, so at most one node is ever built per
//! key and every caller sees the same `Arc<Node>` afterwards. Entries are
//! never evicted or replaced.
//!
//! Keys are full DSNs and may carry credentials; they are never logged.

use crate::base::Node;
use dashmap::DashMap;
use std::sync::Arc;

/// Concurrent memoization cache from a string key to a node.
#[derive(Debug, Default)]
pub struct NodeCache {
    nodes: DashMap<String, Arc<Node>>,
}

impl NodeCache {
    /// Create a new empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Lookup the node cached under `key`.
    pub fn get(&self, key: &str) -> Option<Arc<Node>> {
        self.nodes.get(key).map(|node| Arc::clone(node.value()))
    }

    /// Return the node cached under `key`, building it with `make` on a miss.
    ///
    /// `make` runs at most once per key across all callers.
    pub fn get_or_insert_with<F>(&self, key: &str, make: F) -> Arc<Node>
    where
        F: FnOnce() -> Arc<Node>,
    {
        if let Some(node) = self.get(key) {
            tracing::trace!("node cache hit");
            return node;
        }

        let entry = self.nodes.entry(key.to_string()).or_insert_with(|| {
            tracing::debug!("node cache insert");
            make()
        });
        Arc::clone(entry.value())
    }

    /// Check whether `key` is cached.
    pub fn contains(&self, key: &str) -> bool {
        self.nodes.contains_key(key)
    }

    /// Get number of cached nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if cache is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
