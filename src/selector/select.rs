//! Core selector trait and per-call options.

use crate::base::{Node, SelectorError};
use std::{error::Error, sync::Arc, time::Duration};

/// Per-call hints forwarded to delegate selectors.
///
/// Selectors that do not resolve anything ignore them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectOptions {
    /// Namespace of the target service.
    pub namespace: Option<String>,
    /// Environment the target service runs in.
    pub env_name: Option<String>,
    /// Hash key for consistent routing.
    pub key: Option<String>,
    /// Name of the calling service.
    pub source_service_name: Option<String>,
}

impl SelectOptions {
    /// Create empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set namespace.
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Set environment name.
    pub fn env_name(mut self, env_name: impl Into<String>) -> Self {
        self.env_name = Some(env_name.into());
        self
    }

    /// Set hash key.
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Set source service name.
    pub fn source_service_name(mut self, name: impl Into<String>) -> Self {
        self.source_service_name = Some(name.into());
        self
    }
}

/// Turns a service name into a [`Node`] and accepts call-outcome reports
/// for nodes it produced.
///
/// Implementations must be thread-safe; both methods take `&self` and may
/// be called concurrently. Any blocking behavior belongs to the
/// implementation.
pub trait Selector: Send + Sync {
    /// Resolves `service_name` to a node.
    fn select(&self, service_name: &str, opts: &SelectOptions) -> Result<Arc<Node>, SelectorError>;

    /// Reports the cost and outcome of a call made against `node`.
    ///
    /// `err` is the error the call failed with, if any.
    fn report(
        &self,
        node: &Node,
        cost: Duration,
        err: Option<&(dyn Error + 'static)>,
    ) -> Result<(), SelectorError>;
}

/// Blanket implementation for Arc-wrapped selectors.
impl<S: Selector + ?Sized> Selector for Arc<S> {
    fn select(&self, service_name: &str, opts: &SelectOptions) -> Result<Arc<Node>, SelectorError> {
        (**self).select(service_name, opts)
    }

    fn report(
        &self,
        node: &Node,
        cost: Duration,
        err: Option<&(dyn Error + 'static)>,
    ) -> Result<(), SelectorError> {
        (**self).report(node, cost, err)
    }
}
