//! Service name extraction.
//!
//! A [`ServiceNameExtractor`] locates the logical service name inside a DSN
//! so a delegate selector can resolve it and the result can be spliced back
//! in place.
//!
//! # Example
//!
//! ```rust
//! use dsn_selector::extract::{ServiceNameExtractor, UriHostExtractor};
//!
//! let dsn = "user:secret@tcp(mysql-primary)/orders?timeout=1s";
//! let (pos, len) = UriHostExtractor.extract(dsn).unwrap();
//! assert_eq!(&dsn[pos..pos + len], "mysql-primary");
//! ```

mod host;

pub use host::UriHostExtractor;

use crate::base::ExtractError;

/// Locates the service-name span within a DSN.
///
/// Returns the byte offset and length of the span. Implementations must not
/// assume the span is non-empty; callers reject zero-length results
/// separately.
pub trait ServiceNameExtractor: Send + Sync {
    fn extract(&self, dsn: &str) -> Result<(usize, usize), ExtractError>;
}

impl<F> ServiceNameExtractor for F
where
    F: Fn(&str) -> Result<(usize, usize), ExtractError> + Send + Sync,
{
    fn extract(&self, dsn: &str) -> Result<(usize, usize), ExtractError> {
        self(dsn)
    }
}
