//! Base types and error handling.
//!
//! - [`Node`]: a resolved address record exchanged with delegate selectors
//! - [`SelectorError`] and [`ExtractError`]: failure taxonomy

pub mod error;
pub mod node;

pub use error::{ExtractError, SelectorError};
pub use node::Node;
