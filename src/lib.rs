//! # dsn-selector
//!
//! Resolves logical service names embedded in DSN connection strings.
//!
//! A DSN such as `user:pw@tcp(mysql-orders)/orders?timeout=1s` names a
//! logical service (`mysql-orders`) where a client needs a concrete address.
//! This crate locates that span, asks a named delegate selector (service
//! discovery, a static table, ...) to resolve it, splices the answer back
//! into the DSN, and memoizes the result so repeated selects return the same
//! [`Node`](base::Node). Call outcomes reported against that node reach the
//! delegate's own node.
//!
//! ## Quick Start
//!
//! ```rust
//! use dsn_selector::config::SelectorConfig;
//! use dsn_selector::selector::{SelectOptions, SelectorRegistry};
//!
//! let registry = SelectorRegistry::with_defaults();
//! registry
//!     .register_config(&SelectorConfig::new("mysql+dsn", "dsn"))
//!     .unwrap();
//!
//! let node = registry
//!     .select("mysql+dsn://root:pw@tcp(10.0.0.8:3306)/orders", &SelectOptions::default())
//!     .unwrap();
//! assert_eq!(node.address, "root:pw@tcp(10.0.0.8:3306)/orders");
//! ```
//!
//! ## Modules
//!
//! - [`base`] - Node record and error definitions
//! - [`extract`] - Service name extraction from DSNs
//! - [`selector`] - Plain and resolvable selectors, registry, targets
//! - [`config`] - Declarative selector configuration

pub mod base;
pub mod config;
pub mod extract;
pub mod selector;
