use thiserror::Error;

/// Failure to locate a service name inside a DSN.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ExtractError {
    #[error("parse host from uri: unescaped @ sign in user info")]
    UnescapedAtSign,
    #[error("parse host from uri: must have a / before the query ?")]
    QueryWithoutPath,
    #[error("extract service name failed, src is {dsn}")]
    NoServiceName { dsn: String },
    #[error("extracted span {pos}+{len} is out of bounds for a dsn of {dsn_len} bytes")]
    InvalidSpan { pos: usize, len: usize, dsn_len: usize },
}

/// Errors returned by selectors.
///
/// Delegate errors pass through unchanged; every other variant names the
/// precondition that failed.
#[derive(Debug, Error)]
pub enum SelectorError {
    // Input validation
    #[error("dsn address can not be empty")]
    EmptyAddress,
    #[error("resolver selector name can not be empty")]
    EmptyResolverName,
    #[error("service name extractor can not be nil")]
    MissingExtractor,
    #[error("invalid target {0}, expected scheme://endpoint")]
    InvalidTarget(String),
    #[error("selector name can not be empty")]
    EmptySelectorName,
    #[error("invalid selector config: {0}")]
    Config(#[from] serde_json::Error),

    // Extraction
    #[error(transparent)]
    Extract(#[from] ExtractError),
    #[error("the extracted service name is empty and the dsn is {dsn}")]
    EmptyServiceName { dsn: String },

    // Delegate lookup and resolution
    #[error("unknown selector name {0}")]
    UnknownSelector(String),
    #[error("unknown service name {0}")]
    UnknownService(String),
    #[error(transparent)]
    Delegate(Box<dyn std::error::Error + Send + Sync>),

    // Report-time integrity
    #[error("the resolved node can not be empty")]
    MissingResolvedNode,
}

impl SelectorError {
    /// Wraps an arbitrary error raised by a delegate selector.
    pub fn delegate(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        SelectorError::Delegate(err.into())
    }

    /// Returns true for failures caused by the caller's input rather than
    /// by configuration or a delegate.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            SelectorError::EmptyAddress
                | SelectorError::InvalidTarget(_)
                | SelectorError::Extract(_)
                | SelectorError::EmptyServiceName { .. }
        )
    }
}
