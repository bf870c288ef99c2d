//! Pass-through selector for literal DSNs.

use super::{cache::NodeCache, SelectOptions, Selector};
use crate::base::{Node, SelectorError};
use std::{error::Error, sync::Arc, time::Duration};

/// Registry name of the plain DSN selector.
pub const DSN_SELECTOR_NAME: &str = "dsn";

/// Selector that treats its input as a ready-to-use address.
///
/// Selecting `user:passwd@tcp(ip:port)/db` yields a node whose address is
/// exactly that string. One node is memoized per distinct input.
#[derive(Debug, Default)]
pub struct DsnSelector {
    cache: NodeCache,
}

impl DsnSelector {
    /// Creates a new `DsnSelector` with an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct DSNs seen so far.
    pub fn cached(&self) -> usize {
        self.cache.len()
    }
}

impl Selector for DsnSelector {
    fn select(&self, dsn: &str, _opts: &SelectOptions) -> Result<Arc<Node>, SelectorError> {
        if dsn.is_empty() {
            return Err(SelectorError::EmptyAddress);
        }
        Ok(self
            .cache
            .get_or_insert_with(dsn, || Arc::new(Node::new(dsn, dsn))))
    }

    /// Nothing downstream to report to.
    fn report(
        &self,
        _node: &Node,
        _cost: Duration,
        _err: Option<&(dyn Error + 'static)>,
    ) -> Result<(), SelectorError> {
        Ok(())
    }
}
