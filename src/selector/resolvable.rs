//! DSN selector that resolves an embedded service name through a delegate.
//!
//! Given `user:passwd@polaris-name/db`, an extractor locates `polaris-name`,
//! the delegate selector resolves it to `10.0.0.7:27017`, and the result is
//! spliced back as `user:passwd@10.0.0.7:27017/db`.
//!
//! Nodes are cached by the spliced address, so two DSNs that resolve to the
//! same final address share one node. Each cached node keeps the delegate's
//! own node so reports reach the delegate unchanged.

use super::{cache::NodeCache, registry::SelectorLookup, SelectOptions, Selector};
use crate::base::{ExtractError, Node, SelectorError};
use crate::extract::ServiceNameExtractor;
use std::{error::Error, fmt, sync::Arc, time::Duration};

/// Selector composed of an extractor and a named delegate selector.
///
/// The delegate is looked up by name on every call, so it may be registered
/// after this selector is built.
///
/// # Example
///
/// ```rust
/// use dsn_selector::extract::UriHostExtractor;
/// use dsn_selector::selector::{DsnSelector, ResolvableSelector, SelectorRegistry};
/// use std::sync::Arc;
///
/// let registry = SelectorRegistry::new();
/// let selector = ResolvableSelector::new("dsn", registry.downgrade())
///     .extractor(UriHostExtractor);
/// registry.register("dsn", Arc::new(DsnSelector::new()));
/// registry.register("mysql+dsn", Arc::new(selector));
/// ```
pub struct ResolvableSelector {
    resolver: String,
    extractor: Option<Arc<dyn ServiceNameExtractor>>,
    lookup: Arc<dyn SelectorLookup>,
    sticky: bool,
    by_address: NodeCache,
    by_dsn: NodeCache,
}

impl ResolvableSelector {
    /// Creates a selector delegating to the selector named `resolver`.
    ///
    /// No extractor is set; every `select` fails until one is provided
    /// through [`ResolvableSelector::extractor`].
    pub fn new(resolver: impl Into<String>, lookup: impl SelectorLookup + 'static) -> Self {
        Self {
            resolver: resolver.into(),
            extractor: None,
            lookup: Arc::new(lookup),
            sticky: true,
            by_address: NodeCache::new(),
            by_dsn: NodeCache::new(),
        }
    }

    /// Set the service name extractor.
    pub fn extractor(mut self, extractor: impl ServiceNameExtractor + 'static) -> Self {
        self.extractor = Some(Arc::new(extractor));
        self
    }

    /// Set a shared service name extractor.
    pub fn shared_extractor(mut self, extractor: Arc<dyn ServiceNameExtractor>) -> Self {
        self.extractor = Some(extractor);
        self
    }

    /// Set whether a DSN stays bound to its first resolution.
    ///
    /// When enabled (the default), repeated selects of one DSN return the
    /// cached node without consulting the delegate. When disabled, the
    /// delegate is asked on every select and only the spliced address is
    /// cached.
    pub fn sticky(mut self, sticky: bool) -> Self {
        self.sticky = sticky;
        self
    }

    /// Name of the delegate selector.
    pub fn resolver(&self) -> &str {
        &self.resolver
    }

    /// Number of distinct spliced addresses cached.
    pub fn cached(&self) -> usize {
        self.by_address.len()
    }

    fn extract_service(&self, dsn: &str) -> Result<(usize, usize), SelectorError> {
        if self.resolver.is_empty() {
            return Err(SelectorError::EmptyResolverName);
        }
        let extractor = self.extractor.as_ref().ok_or(SelectorError::MissingExtractor)?;
        if dsn.is_empty() {
            return Err(SelectorError::EmptyAddress);
        }

        let (pos, len) = extractor.extract(dsn)?;
        if len == 0 {
            return Err(SelectorError::EmptyServiceName {
                dsn: dsn.to_string(),
            });
        }
        let in_bounds = pos
            .checked_add(len)
            .is_some_and(|end| dsn.get(pos..end).is_some());
        if !in_bounds {
            return Err(ExtractError::InvalidSpan {
                pos,
                len,
                dsn_len: dsn.len(),
            }
            .into());
        }
        Ok((pos, len))
    }

    fn delegate(&self) -> Result<Arc<dyn Selector>, SelectorError> {
        self.lookup.lookup(&self.resolver).ok_or_else(|| {
            tracing::warn!(resolver = %self.resolver, "delegate selector not registered");
            SelectorError::UnknownSelector(self.resolver.clone())
        })
    }

    fn resolve(&self, dsn: &str, opts: &SelectOptions) -> Result<Arc<Node>, SelectorError> {
        let (pos, len) = self.extract_service(dsn)?;
        let end = pos + len;
        let service_name = &dsn[pos..end];

        let resolved = self.delegate()?.select(service_name, opts)?;

        let address = format!("{}{}{}", &dsn[..pos], resolved.address, &dsn[end..]);
        if address.is_empty() {
            return Err(SelectorError::EmptyAddress);
        }

        tracing::debug!(
            resolver = %self.resolver,
            service = %service_name,
            resolved = %resolved.address,
            "resolved dsn service name"
        );

        Ok(self.by_address.get_or_insert_with(&address, || {
            Arc::new(Node::new(dsn, address.as_str()).with_resolved(resolved))
        }))
    }
}

impl Selector for ResolvableSelector {
    fn select(&self, dsn: &str, opts: &SelectOptions) -> Result<Arc<Node>, SelectorError> {
        if !self.sticky {
            return self.resolve(dsn, opts);
        }
        if let Some(node) = self.by_dsn.get(dsn) {
            return Ok(node);
        }
        let node = self.resolve(dsn, opts)?;
        Ok(self.by_dsn.get_or_insert_with(dsn, || node))
    }

    /// Forwards the report to the delegate using the delegate's own node.
    ///
    /// Only nodes returned by this selector's `select` carry one; any other
    /// node is rejected. The call is recorded on `node` only once the
    /// delegate accepts the report.
    fn report(
        &self,
        node: &Node,
        cost: Duration,
        err: Option<&(dyn Error + 'static)>,
    ) -> Result<(), SelectorError> {
        let resolved = node.resolved().ok_or(SelectorError::MissingResolvedNode)?;
        self.delegate()?.report(resolved, cost, err)?;
        node.record(cost, err.is_some());
        Ok(())
    }
}

impl fmt::Debug for ResolvableSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvableSelector")
            .field("resolver", &self.resolver)
            .field("has_extractor", &self.extractor.is_some())
            .field("sticky", &self.sticky)
            .field("cached", &self.by_address.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::UriHostExtractor;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StaticSelector {
        address: &'static str,
        selects: AtomicUsize,
    }

    impl Selector for StaticSelector {
        fn select(&self, name: &str, _opts: &SelectOptions) -> Result<Arc<Node>, SelectorError> {
            self.selects.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(Node::new(name, self.address)))
        }

        fn report(
            &self,
            node: &Node,
            cost: Duration,
            err: Option<&(dyn Error + 'static)>,
        ) -> Result<(), SelectorError> {
            node.record(cost, err.is_some());
            Ok(())
        }
    }

    fn fixed(address: &'static str) -> (Arc<StaticSelector>, ResolvableSelector) {
        let delegate = Arc::new(StaticSelector {
            address,
            selects: AtomicUsize::new(0),
        });
        let shared = delegate.clone();
        let selector = ResolvableSelector::new("static", move |name: &str| {
            (name == "static").then(|| shared.clone() as Arc<dyn Selector>)
        })
        .extractor(UriHostExtractor);
        (delegate, selector)
    }

    #[test]
    fn test_splice_uri_host() {
        let (_, selector) = fixed("10.0.0.7:27017");
        let node = selector
            .select("user:pw@mongo-orders/orders?w=1", &SelectOptions::default())
            .unwrap();

        assert_eq!(node.address, "user:pw@10.0.0.7:27017/orders?w=1");
        assert_eq!(node.service_name, "user:pw@mongo-orders/orders?w=1");
        assert_eq!(node.resolved().unwrap().service_name, "mongo-orders");
    }

    #[test]
    fn test_splice_mysql_keeps_wrapper() {
        let (_, selector) = fixed("10.0.0.8:3306");
        let node = selector
            .select("root:pw@tcp(mysql-users)/users", &SelectOptions::default())
            .unwrap();

        assert_eq!(node.address, "root:pw@tcp(10.0.0.8:3306)/users");
    }

    #[test]
    fn test_empty_span_rejected() {
        let (delegate, selector) = fixed("1.1.1.1:1");
        let err = selector.select("user@/db", &SelectOptions::default()).unwrap_err();

        assert_eq!(err.to_string(), "the extracted service name is empty and the dsn is user@/db");
        assert_eq!(delegate.selects.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_empty_dsn() {
        let (delegate, selector) = fixed("1.1.1.1:1");
        let err = selector.select("", &SelectOptions::default()).unwrap_err();

        assert_eq!(err.to_string(), "dsn address can not be empty");
        assert_eq!(delegate.selects.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_empty_spliced_address() {
        let (delegate, selector) = fixed("");
        let err = selector.select("svc", &SelectOptions::default()).unwrap_err();

        assert!(matches!(err, SelectorError::EmptyAddress));
        assert_eq!(delegate.selects.load(Ordering::SeqCst), 1);
        assert_eq!(selector.cached(), 0);
    }

    #[test]
    fn test_shared_extractor_across_selectors() {
        let extractor: Arc<dyn ServiceNameExtractor> = Arc::new(UriHostExtractor);
        let (_, orders) = fixed("10.0.0.1:27017");
        let orders = orders.shared_extractor(extractor.clone());
        let (_, users) = fixed("10.0.0.2:3306");
        let users = users.shared_extractor(extractor.clone());

        assert_eq!(orders.resolver(), "static");
        assert_eq!(users.resolver(), "static");
        assert_eq!(Arc::strong_count(&extractor), 3);

        let opts = SelectOptions::default();
        let a = orders.select("u@orders/db", &opts).unwrap();
        let b = users.select("u@tcp(users)/db", &opts).unwrap();
        assert_eq!(a.address, "u@10.0.0.1:27017/db");
        assert_eq!(b.address, "u@tcp(10.0.0.2:3306)/db");
    }

    #[test]
    fn test_failed_forward_is_not_recorded() {
        struct Rejecting;

        impl Selector for Rejecting {
            fn select(
                &self,
                name: &str,
                _opts: &SelectOptions,
            ) -> Result<Arc<Node>, SelectorError> {
                Ok(Arc::new(Node::new(name, "10.0.0.9:80")))
            }

            fn report(
                &self,
                _node: &Node,
                _cost: Duration,
                _err: Option<&(dyn Error + 'static)>,
            ) -> Result<(), SelectorError> {
                Err(SelectorError::delegate("report backend down"))
            }
        }

        let delegate: Arc<dyn Selector> = Arc::new(Rejecting);
        let selector = ResolvableSelector::new("rejecting", move |_: &str| Some(delegate.clone()))
            .extractor(UriHostExtractor);
        let node = selector.select("u@svc/db", &SelectOptions::default()).unwrap();

        let err = selector
            .report(&node, Duration::from_millis(4), None)
            .unwrap_err();
        assert_eq!(err.to_string(), "report backend down");
        assert_eq!(node.report_count(), 0);
    }

    #[test]
    fn test_misconfiguration_checked_before_input() {
        let selector =
            ResolvableSelector::new("static", |_: &str| -> Option<Arc<dyn Selector>> { None });
        let err = selector.select("", &SelectOptions::default()).unwrap_err();
        assert!(matches!(err, SelectorError::MissingExtractor));
    }

    #[test]
    fn test_out_of_bounds_span_rejected() {
        let selector =
            ResolvableSelector::new("static", |_: &str| -> Option<Arc<dyn Selector>> { None })
                .extractor(|_: &str| -> Result<(usize, usize), ExtractError> { Ok((2, 10)) });
        let err = selector.select("abc", &SelectOptions::default()).unwrap_err();

        assert!(matches!(
            err,
            SelectorError::Extract(ExtractError::InvalidSpan { pos: 2, len: 10, dsn_len: 3 })
        ));
    }

    #[test]
    fn test_sticky_skips_delegate_on_hit() {
        let (delegate, selector) = fixed("1.1.1.1:1");
        let opts = SelectOptions::default();
        let a = selector.select("u@svc/db", &opts).unwrap();
        let b = selector.select("u@svc/db", &opts).unwrap();

        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(delegate.selects.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_non_sticky_asks_delegate_every_time() {
        let (delegate, selector) = fixed("1.1.1.1:1");
        let selector = selector.sticky(false);
        let opts = SelectOptions::default();
        let a = selector.select("u@svc/db", &opts).unwrap();
        let b = selector.select("u@svc/db", &opts).unwrap();

        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(delegate.selects.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_shared_final_address() {
        let (_, selector) = fixed("1.1.1.1:1");
        let opts = SelectOptions::default();
        let a = selector.select("u@svc-a/db", &opts).unwrap();
        let b = selector.select("u@svc-b/db", &opts).unwrap();

        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(selector.cached(), 1);
    }

    #[test]
    fn test_report_records_on_both_nodes() {
        let (_, selector) = fixed("1.1.1.1:1");
        let node = selector.select("u@svc/db", &SelectOptions::default()).unwrap();
        let err = std::io::Error::new(std::io::ErrorKind::TimedOut, "timeout");

        selector
            .report(&node, Duration::from_millis(30), Some(&err))
            .unwrap();

        let resolved = node.resolved().unwrap();
        assert_eq!(node.report_count(), 1);
        assert_eq!(resolved.report_count(), 1);
        assert_eq!(resolved.failure_count(), 1);
        assert_eq!(resolved.last_cost(), Duration::from_millis(30));
    }

    #[test]
    fn test_report_foreign_node() {
        let (_, selector) = fixed("1.1.1.1:1");
        let foreign = Node::new("x", "y");
        let err = selector.report(&foreign, Duration::ZERO, None).unwrap_err();

        assert!(matches!(err, SelectorError::MissingResolvedNode));
        assert_eq!(foreign.report_count(), 0);
    }
}
