//! Declarative selector configuration.
//!
//! ```json
//! [
//!   { "name": "mongodb+polaris", "resolver": "polaris" },
//!   { "name": "mysql+polaris", "resolver": "polaris", "sticky": false }
//! ]
//! ```

use crate::base::SelectorError;
use crate::extract::UriHostExtractor;
use crate::selector::{ResolvableSelector, SelectorLookup};
use serde::{Deserialize, Serialize};

/// How a configured selector locates the service name in a DSN.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractorKind {
    /// [`UriHostExtractor`]: the host section of a URI-style DSN.
    #[default]
    UriHost,
    /// No extractor; every select fails.
    None,
}

/// Configuration for one [`ResolvableSelector`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorConfig {
    /// Name the selector is registered under.
    pub name: String,
    /// Name of the delegate selector that resolves service names.
    pub resolver: String,
    /// Service name extractor
    #[serde(default)]
    pub extractor: ExtractorKind,
    /// Keep each DSN bound to its first resolution
    #[serde(default = "default_sticky")]
    pub sticky: bool,
}

fn default_sticky() -> bool {
    true
}

impl SelectorConfig {
    /// Create a config with the default extractor and stickiness.
    pub fn new(name: impl Into<String>, resolver: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            resolver: resolver.into(),
            extractor: ExtractorKind::default(),
            sticky: default_sticky(),
        }
    }

    /// Set extractor kind.
    pub fn with_extractor(mut self, extractor: ExtractorKind) -> Self {
        self.extractor = extractor;
        self
    }

    /// Set stickiness.
    pub fn with_sticky(mut self, sticky: bool) -> Self {
        self.sticky = sticky;
        self
    }

    /// Parse a single config from JSON.
    pub fn from_json(json: &str) -> Result<Self, SelectorError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse a list of configs from a JSON array.
    pub fn list_from_json(json: &str) -> Result<Vec<Self>, SelectorError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Build the selector, looking delegates up through `lookup`.
    pub fn build(&self, lookup: impl SelectorLookup + 'static) -> ResolvableSelector {
        let selector = ResolvableSelector::new(self.resolver.as_str(), lookup).sticky(self.sticky);
        match self.extractor {
            ExtractorKind::UriHost => selector.extractor(UriHostExtractor),
            ExtractorKind::None => selector,
        }
    }
}
