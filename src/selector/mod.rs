//! DSN selectors.
//!
//! Provides the [`Selector`] abstraction and two implementations:
//! - [`DsnSelector`]: uses the DSN itself as the address
//! - [`ResolvableSelector`]: resolves a service name embedded in the DSN
//!   through a named delegate selector and splices the result back
//!
//! # Example
//!
//! ```rust
//! use dsn_selector::selector::{SelectOptions, SelectorRegistry};
//!
//! let registry = SelectorRegistry::with_defaults();
//! let node = registry
//!     .select("dsn://user:pw@tcp(db:3306)/app", &SelectOptions::default())
//!     .unwrap();
//! assert_eq!(node.address, "user:pw@tcp(db:3306)/app");
//! ```

mod cache;
mod dsn;
mod registry;
mod resolvable;
mod select;
mod target;

pub use cache::NodeCache;
pub use dsn::{DsnSelector, DSN_SELECTOR_NAME};
pub use registry::{SelectorLookup, SelectorRegistry, WeakSelectorRegistry};
pub use resolvable::ResolvableSelector;
pub use select::{SelectOptions, Selector};
pub use target::Target;
