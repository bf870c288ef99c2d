//! Named selector lookup.
//!
//! Resolvable selectors find their delegate by name at call time through a
//! [`SelectorLookup`]. [`SelectorRegistry`] is the usual implementation; a
//! closure works for one-off wiring and tests.

use super::{
    dsn::{DsnSelector, DSN_SELECTOR_NAME},
    target::Target,
    SelectOptions, Selector,
};
use crate::base::{Node, SelectorError};
use crate::config::SelectorConfig;
use dashmap::DashMap;
use std::{
    error::Error,
    fmt,
    sync::{Arc, Weak},
    time::Duration,
};

type Selectors = DashMap<String, Arc<dyn Selector>>;

/// Looks up a selector by name.
pub trait SelectorLookup: Send + Sync {
    fn lookup(&self, name: &str) -> Option<Arc<dyn Selector>>;
}

impl<F> SelectorLookup for F
where
    F: Fn(&str) -> Option<Arc<dyn Selector>> + Send + Sync,
{
    fn lookup(&self, name: &str) -> Option<Arc<dyn Selector>> {
        self(name)
    }
}

/// Thread-safe name to selector map.
///
/// Cloning is cheap and clones share the same entries.
#[derive(Clone, Default)]
pub struct SelectorRegistry {
    selectors: Arc<Selectors>,
}

impl SelectorRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the plain [`DsnSelector`] registered as `dsn`.
    pub fn with_defaults() -> Self {
        let registry = Self::new();
        registry.register(DSN_SELECTOR_NAME, Arc::new(DsnSelector::new()));
        registry
    }

    /// Register `selector` under `name`, returning the one it replaced.
    pub fn register(
        &self,
        name: impl Into<String>,
        selector: Arc<dyn Selector>,
    ) -> Option<Arc<dyn Selector>> {
        let name = name.into();
        tracing::debug!(name = %name, "registering selector");
        self.selectors.insert(name, selector)
    }

    /// Build a [`ResolvableSelector`](super::ResolvableSelector) from `config` and register it.
    ///
    /// The new selector looks its delegate up in this registry through a
    /// weak handle, so the delegate may be registered later.
    pub fn register_config(&self, config: &SelectorConfig) -> Result<(), SelectorError> {
        if config.name.is_empty() {
            return Err(SelectorError::EmptySelectorName);
        }
        let selector = config.build(self.downgrade());
        self.register(config.name.as_str(), Arc::new(selector));
        Ok(())
    }

    /// Lookup a selector by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Selector>> {
        self.selectors.get(name).map(|s| Arc::clone(s.value()))
    }

    /// Remove a selector by name.
    pub fn unregister(&self, name: &str) -> Option<Arc<dyn Selector>> {
        self.selectors.remove(name).map(|(_, selector)| selector)
    }

    /// Check whether `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.selectors.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.selectors.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    /// Get number of registered selectors.
    pub fn len(&self) -> usize {
        self.selectors.len()
    }

    /// Check if registry is empty.
    pub fn is_empty(&self) -> bool {
        self.selectors.is_empty()
    }

    /// A handle that does not keep the registry alive.
    pub fn downgrade(&self) -> WeakSelectorRegistry {
        WeakSelectorRegistry {
            selectors: Arc::downgrade(&self.selectors),
        }
    }

    /// Select through the selector named by the target's scheme.
    pub fn select(&self, target: &str, opts: &SelectOptions) -> Result<Arc<Node>, SelectorError> {
        let target = Target::parse(target)?;
        self.selector_for(&target)?.select(target.endpoint, opts)
    }

    /// Report a call outcome to the selector named by the target's scheme.
    pub fn report(
        &self,
        target: &str,
        node: &Node,
        cost: Duration,
        err: Option<&(dyn Error + 'static)>,
    ) -> Result<(), SelectorError> {
        let target = Target::parse(target)?;
        self.selector_for(&target)?.report(node, cost, err)
    }

    fn selector_for(&self, target: &Target<'_>) -> Result<Arc<dyn Selector>, SelectorError> {
        self.get(target.scheme)
            .ok_or_else(|| SelectorError::UnknownSelector(target.scheme.to_string()))
    }
}

impl SelectorLookup for SelectorRegistry {
    fn lookup(&self, name: &str) -> Option<Arc<dyn Selector>> {
        self.get(name)
    }
}

impl fmt::Debug for SelectorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectorRegistry")
            .field("names", &self.names())
            .finish()
    }
}

/// Weak handle on a [`SelectorRegistry`].
///
/// Lookups return `None` once every strong handle is gone.
#[derive(Clone, Debug)]
pub struct WeakSelectorRegistry {
    selectors: Weak<Selectors>,
}

impl SelectorLookup for WeakSelectorRegistry {
    fn lookup(&self, name: &str) -> Option<Arc<dyn Selector>> {
        let selectors = self.selectors.upgrade()?;
        let selector = selectors.get(name).map(|s| Arc::clone(s.value()));
        selector
    }
}
