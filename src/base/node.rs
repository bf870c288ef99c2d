//! Resolved address records.

use dashmap::DashMap;
use std::{
    fmt,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};

/// Result of resolving a service name to a network address.
///
/// Selectors hand nodes out as `Arc<Node>`, and a cached node is never
/// replaced, so `Arc::ptr_eq` holds between repeated lookups of one key.
pub struct Node {
    /// The logical name or original DSN that was resolved.
    pub service_name: String,
    /// The concrete, usable address.
    pub address: String,
    resolved: Option<Arc<Node>>,
    metadata: DashMap<String, String>,
    reports: AtomicU64,
    failures: AtomicU64,
    last_cost_nanos: AtomicU64,
}

impl Node {
    /// Creates a node with no delegate result attached.
    pub fn new(service_name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            address: address.into(),
            resolved: None,
            metadata: DashMap::new(),
            reports: AtomicU64::new(0),
            failures: AtomicU64::new(0),
            last_cost_nanos: AtomicU64::new(0),
        }
    }

    /// Attaches the node a delegate selector produced for this one.
    pub fn with_resolved(mut self, resolved: Arc<Node>) -> Self {
        self.resolved = Some(resolved);
        self
    }

    /// The delegate's own node, if this node came from a delegated resolution.
    pub fn resolved(&self) -> Option<&Arc<Node>> {
        self.resolved.as_ref()
    }

    /// Looks up a metadata value.
    pub fn metadata(&self, key: &str) -> Option<String> {
        self.metadata.get(key).map(|v| v.value().clone())
    }

    /// Sets a metadata value, returning the previous one.
    ///
    /// Takes `&self` so delegates can annotate shared nodes.
    pub fn set_metadata(&self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.metadata.insert(key.into(), value.into())
    }

    /// Records the outcome of one call made against this node.
    pub fn record(&self, cost: Duration, failed: bool) {
        self.reports.fetch_add(1, Ordering::Relaxed);
        if failed {
            self.failures.fetch_add(1, Ordering::Relaxed);
        }
        let nanos = u64::try_from(cost.as_nanos()).unwrap_or(u64::MAX);
        self.last_cost_nanos.store(nanos, Ordering::Relaxed);
    }

    /// Number of calls recorded.
    pub fn report_count(&self) -> u64 {
        self.reports.load(Ordering::Relaxed)
    }

    /// Number of recorded calls that failed.
    pub fn failure_count(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    /// Cost of the most recently recorded call.
    pub fn last_cost(&self) -> Duration {
        Duration::from_nanos(self.last_cost_nanos.load(Ordering::Relaxed))
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("service_name", &self.service_name)
            .field("address", &self.address)
            .field("resolved", &self.resolved.as_ref().map(|n| &n.address))
            .field("metadata_len", &self.metadata.len())
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.service_name, self.address)
    }
}
