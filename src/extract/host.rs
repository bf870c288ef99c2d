//! Host extraction for URI-style DSNs.
//!
//! Handles MongoDB/Redis style `user:pass@host1,host2/db?opts` and MySQL
//! style `user:pass@tcp(host:port)/db?opts`. The `scheme://` prefix must be
//! stripped by the caller.

use super::ServiceNameExtractor;
use crate::base::ExtractError;

const TCP_PREFIX: &str = "tcp(";
const TCP_SUFFIX: &str = ")";

/// Extracts the host section of a URI-style DSN.
///
/// The host starts after the last `@` so passwords containing `@` are
/// tolerated, and ends at the first `/`. Any further `@`, or a `?` before
/// the first `/`, is rejected.
#[derive(Clone, Copy, Debug, Default)]
pub struct UriHostExtractor;

impl UriHostExtractor {
    /// Creates a new `UriHostExtractor`.
    pub fn new() -> Self {
        Self
    }

    fn strip_protocol_token(host: &str, begin: usize) -> (usize, usize) {
        let mut begin = begin;
        let mut length = host.len();
        if host.starts_with(TCP_PREFIX) {
            begin += TCP_PREFIX.len();
            length -= TCP_PREFIX.len();
        }
        if host.ends_with(TCP_SUFFIX) {
            length -= TCP_SUFFIX.len();
        }
        (begin, length)
    }
}

impl ServiceNameExtractor for UriHostExtractor {
    fn extract(&self, uri: &str) -> Result<(usize, usize), ExtractError> {
        let begin = uri.rfind('@').map_or(0, |idx| idx + 1);
        let rest = &uri[begin..];

        let end = match rest.find(['/', '?', '@']) {
            Some(idx) => match rest.as_bytes()[idx] {
                b'@' => return Err(ExtractError::UnescapedAtSign),
                b'?' => return Err(ExtractError::QueryWithoutPath),
                _ => idx,
            },
            None => rest.len(),
        };

        let (pos, len) = Self::strip_protocol_token(&rest[..end], begin);
        tracing::trace!(pos, len, "extracted host span");
        Ok((pos, len))
    }
}
