//! `scheme://endpoint` target parsing.

use crate::base::SelectorError;
use std::fmt;

const SCHEME_SEPARATOR: &str = "://";

/// A client target split into the selector name and the DSN it selects.
///
/// `mongodb+polaris://user:pw@orders/db` names the `mongodb+polaris`
/// selector and hands it `user:pw@orders/db`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Target<'a> {
    /// Selector name.
    pub scheme: &'a str,
    /// Everything after `://`.
    pub endpoint: &'a str,
}

impl<'a> Target<'a> {
    /// Splits `target` at the first `://`.
    pub fn parse(target: &'a str) -> Result<Self, SelectorError> {
        match target.split_once(SCHEME_SEPARATOR) {
            Some((scheme, endpoint)) if !scheme.is_empty() && !endpoint.is_empty() => {
                Ok(Self { scheme, endpoint })
            }
            _ => Err(SelectorError::InvalidTarget(target.to_string())),
        }
    }
}

impl fmt::Display for Target<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.scheme, SCHEME_SEPARATOR, self.endpoint)
    }
}
