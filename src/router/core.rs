//! Router core module - registration and the lookup hot path.

#![deny(clippy::inefficient_to_string)]
#![deny(clippy::format_push_string)]
#![deny(clippy::unnecessary_to_owned)]

use http::Method;
use smallvec::SmallVec;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::error::RouteError;
use crate::middleware::{run_chain, Middleware, MiddlewareEntry, MountPoint, Plugin};
use crate::runtime_config::RouterConfig;
use crate::segment::{segmentize, Segment};

use super::splat::{map_params, resolve_trailing};
use super::trie::{Arena, NodeId};

/// Maximum number of path parameters before heap allocation.
pub const MAX_INLINE_PARAMS: usize = 8;

/// Parameter storage for a match: `(name, value)` pairs in declaration order.
///
/// Names come from the route tree and are shared through `Arc<str>`; values
/// are per-request data taken from the path.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// A terminal registration
pub struct Route<H, O = ()> {
    pub(crate) method: Method,
    pub(crate) params: Vec<Arc<str>>,
    pub(crate) handler: H,
    pub(crate) path: String,
    pub(crate) options: Option<O>,
}

impl<H, O> Route<H, O> {
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Parameter names in the order the pattern declares them.
    #[must_use]
    pub fn params(&self) -> &[Arc<str>] {
        &self.params
    }

    #[must_use]
    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// The pattern exactly as it was registered.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn options(&self) -> Option<&O> {
        self.options.as_ref()
    }
}

impl<H: fmt::Debug, O: fmt::Debug> fmt::Debug for Route<H, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("params", &self.params)
            .field("handler", &self.handler)
            .field("options", &self.options)
            .finish()
    }
}

/// Result of successfully resolving a request path
///
/// # Example
///
/// ```rust
/// use trierouter::router::Router;
/// use http::Method;
///
/// let mut router = Router::new();
/// router.add_route(Method::GET, "/users/:id", "get_user", None).unwrap();
///
/// let m = router.find("/users/42", &Method::GET).unwrap();
/// assert_eq!(*m.handler(), "get_user");
/// assert_eq!(m.param("id"), Some("42"));
/// ```
pub struct RouteMatch<H, O = ()> {
    /// The registered route that serves the request
    pub route: Arc<Route<H, O>>,
    /// Parameter values bound by position to the route's parameter names
    pub params: ParamVec,
    /// Segments absorbed by a splat that were kept as candidate parameter values
    pub splat: Vec<String>,
    /// Always `true` for a returned match
    pub matched: bool,
}

impl<H, O> RouteMatch<H, O> {
    #[inline]
    #[must_use]
    pub fn handler(&self) -> &H {
        &self.route.handler
    }

    /// The matched pattern as registered (e.g. `/or/a|b`).
    #[inline]
    #[must_use]
    pub fn path(&self) -> &str {
        &self.route.path
    }

    /// Get a parameter by name
    ///
    /// Uses "last write wins" semantics when a name is declared twice.
    #[inline]
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Convert params to a HashMap
    /// Note: This allocates - use param() in hot paths instead
    #[must_use]
    pub fn params_map(&self) -> HashMap<String, String> {
        self.params
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }
}

impl<H, O> Clone for RouteMatch<H, O> {
    fn clone(&self) -> Self {
        Self {
            route: Arc::clone(&self.route),
            params: self.params.clone(),
            splat: self.splat.clone(),
            matched: self.matched,
        }
    }
}

impl<H: fmt::Debug, O: fmt::Debug> fmt::Debug for RouteMatch<H, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteMatch")
            .field("route", &self.route)
            .field("params", &self.params)
            .field("splat", &self.splat)
            .field("matched", &self.matched)
            .finish()
    }
}

impl<H, O> fmt::Debug for Router<H, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("route_count", &self.route_count)
            .field("nodes", &self.arena.len())
            .field("slow_match", &self.slow_match)
            .finish()
    }
}

/// Why a lookup produced no match. Only surfaced through logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Miss {
    NoPath,
    NoMethod,
    MiddlewareRejected,
}

impl Miss {
    fn as_str(self) -> &'static str {
        match self {
            Miss::NoPath => "no_path",
            Miss::NoMethod => "no_method",
            Miss::MiddlewareRejected => "middleware_rejected",
        }
    }
}

/// How far a registration has progressed past a splat segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AfterSplat {
    /// No splat, or a static segment has followed it
    No,
    /// A splat was just consumed
    Splat,
    /// The splat's parameter child was entered; further params are absorbed
    ParamTaken,
}

/// Segment-trie router
///
/// `H` is the handler payload and `O` an options bag; the router stores both
/// and never inspects them.
///
/// # Pattern grammar
///
/// - `users` static segment, exact match
/// - `:id` parameter, matches any single segment
/// - `*` splat, matches segments until a more specific continuation
/// - `a|b` alternation, every literal reaches the same subtree
///
/// # Lifecycle
///
/// Registration takes `&mut self` and lookups take `&self`, so a router is
/// populated first and then served. To share one across threads and swap it
/// wholesale, hand it to [`SharedRouter`](crate::shared::SharedRouter).
pub struct Router<H, O = ()> {
    arena: Arena<H, O>,
    route_count: usize,
    slow_match: Duration,
}

impl<H, O> Default for Router<H, O> {
    fn default() -> Self {
        Self {
            arena: Arena::new(),
            route_count: 0,
            slow_match: Duration::from_micros(RouterConfig::DEFAULT_SLOW_MATCH_US),
        }
    }
}

impl<H> Router<H> {
    /// Create an empty router without an options type.
    ///
    /// Routers carrying options are built with [`Default`] or
    /// [`from_config`](Self::from_config).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty router using the slow-match threshold from `config`.
    #[must_use]
    pub fn with_config(config: &RouterConfig) -> Self {
        Self::from_config(config)
    }
}

impl<H, O> Router<H, O> {
    /// Create an empty router for any options type using `config`.
    #[must_use]
    pub fn from_config(config: &RouterConfig) -> Self {
        Self {
            slow_match: config.slow_match,
            ..Self::default()
        }
    }

    /// The root node. Routes added at the root behave like [`add_route`](Self::add_route).
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Number of method routes registered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.route_count
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.route_count == 0
    }

    /// Number of nodes in the tree, the root included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    /// Register `handler` for `method` on `pattern`.
    ///
    /// # Errors
    ///
    /// [`RouteError::DuplicateRoute`] when the pattern resolves to a node that
    /// already has a route for `method`. Patterns differing only in
    /// parameter names resolve to the same node.
    pub fn add_route(
        &mut self,
        method: Method,
        pattern: &str,
        handler: H,
        options: Option<O>,
    ) -> Result<Arc<Route<H, O>>, RouteError> {
        self.add_route_at(NodeId::ROOT, method, pattern, handler, options)
    }

    /// Register a route relative to `base` instead of the root.
    ///
    /// Used by plugins to add routes below their mount point.
    ///
    /// # Errors
    ///
    /// [`RouteError::UnknownNode`] if `base` is not part of this router, plus
    /// everything [`add_route`](Self::add_route) can return.
    pub fn add_route_at(
        &mut self,
        base: NodeId,
        method: Method,
        pattern: &str,
        handler: H,
        options: Option<O>,
    ) -> Result<Arc<Route<H, O>>, RouteError> {
        let (node, params) = self.descend(base, pattern)?;
        let target = self.arena.get_mut(node).ok_or(RouteError::UnknownNode(node))?;
        if target.routes.contains_key(&method) {
            warn!(method = %method, path = %pattern, "Duplicate route rejected");
            return Err(RouteError::DuplicateRoute {
                method,
                path: pattern.to_string(),
            });
        }

        let route = Arc::new(Route {
            method: method.clone(),
            params,
            handler,
            path: pattern.to_string(),
            options,
        });
        target.routes.insert(method.clone(), Arc::clone(&route));
        self.route_count += 1;

        debug!(
            method = %method,
            path = %pattern,
            params = ?route.params,
            node = node.index(),
            "Route registered"
        );
        Ok(route)
    }

    /// Register the same handler for several methods.
    ///
    /// Routes are returned in `methods` order. Registration stops at the first
    /// error; routes added before it stay registered.
    ///
    /// # Errors
    ///
    /// The first error returned by [`add_route`](Self::add_route).
    pub fn any_of(
        &mut self,
        methods: &[Method],
        pattern: &str,
        handler: H,
        options: Option<O>,
    ) -> Result<Vec<Arc<Route<H, O>>>, RouteError>
    where
        H: Clone,
        O: Clone,
    {
        methods
            .iter()
            .map(|method| self.add_route(method.clone(), pattern, handler.clone(), options.clone()))
            .collect()
    }

    /// Attach a gate to the node `pattern` resolves to.
    ///
    /// `/` resolves to the static child keyed by `""`, not to the root, so a
    /// gate mounted there only runs for requests to `/` itself. There is no
    /// global gate; mount one per top-level prefix instead.
    ///
    /// # Errors
    ///
    /// Only pattern errors such as [`RouteError::EmptyAlternative`].
    pub fn use_middleware<M>(&mut self, pattern: &str, middleware: M) -> Result<(), RouteError>
    where
        M: Middleware + 'static,
    {
        let (node, params) = self.descend(NodeId::ROOT, pattern)?;
        self.attach(node, params, Box::new(middleware));
        debug!(path = %pattern, node = node.index(), "Middleware attached");
        Ok(())
    }

    /// Mount a plugin at `pattern`.
    ///
    /// The plugin runs immediately with the mount point; a gate it returns is
    /// attached at that node.
    ///
    /// # Errors
    ///
    /// Pattern errors, or [`RouteError::Plugin`] wrapping the plugin's failure.
    pub fn mount<P>(&mut self, pattern: &str, plugin: P, options: Option<O>) -> Result<(), RouteError>
    where
        P: Plugin<H, O>,
    {
        let (node, params) = self.descend(NodeId::ROOT, pattern)?;
        let at = MountPoint {
            node,
            path: pattern.to_string(),
            params,
            options,
        };
        let gate = plugin.install(self, &at).map_err(|source| RouteError::Plugin {
            path: pattern.to_string(),
            source,
        })?;
        if let Some(gate) = gate {
            self.attach(node, at.params, gate);
        }
        info!(path = %pattern, node = node.index(), "Plugin mounted");
        Ok(())
    }

    fn attach(&mut self, node: NodeId, params: Vec<Arc<str>>, gate: Box<dyn Middleware>) {
        if let Some(target) = self.arena.get_mut(node) {
            target.middleware.push(MiddlewareEntry { params, gate });
        }
    }

    /// Walk `pattern` from `base`, creating nodes as needed.
    ///
    /// Returns the destination node and the parameter names in declaration
    /// order. After a splat only the first parameter adds depth; the ones that
    /// follow it are recorded but stay on the same node, and get their values
    /// from the splat's leftovers at lookup time.
    fn descend(&mut self, base: NodeId, pattern: &str) -> Result<(NodeId, Vec<Arc<str>>), RouteError> {
        if !self.arena.contains(base) {
            return Err(RouteError::UnknownNode(base));
        }
        let mut node = base;
        let mut params: Vec<Arc<str>> = Vec::new();
        let mut after_splat = AfterSplat::No;

        for token in segmentize(pattern) {
            match Segment::parse(token) {
                Segment::Param(name) => {
                    params.push(Arc::from(name));
                    match after_splat {
                        AfterSplat::ParamTaken => continue,
                        AfterSplat::Splat => after_splat = AfterSplat::ParamTaken,
                        AfterSplat::No => {}
                    }
                    node = self.arena.param_child_or_insert(node);
                }
                Segment::Splat => {
                    after_splat = AfterSplat::Splat;
                    node = self.arena.splat_child_or_insert(node);
                }
                segment @ (Segment::Static(_) | Segment::Alternation(_)) => {
                    after_splat = AfterSplat::No;
                    let literals = segment.literals();
                    if literals.len() > 1 && literals.iter().any(|l| l.is_empty()) {
                        return Err(RouteError::EmptyAlternative {
                            path: pattern.to_string(),
                        });
                    }
                    node = self.arena.bind_literals(node, &literals);
                }
            }
        }
        Ok((node, params))
    }

    /// Resolve `pattern` to an existing node without registering anything.
    ///
    /// Alternations resolve through their last bound literal.
    #[must_use]
    pub fn node_for(&self, pattern: &str) -> Option<NodeId> {
        let mut node = NodeId::ROOT;
        let mut after_splat = AfterSplat::No;
        for token in segmentize(pattern) {
            let current = self.arena.get(node)?;
            node = match Segment::parse(token) {
                Segment::Param(_) => match after_splat {
                    AfterSplat::ParamTaken => continue,
                    AfterSplat::Splat => {
                        after_splat = AfterSplat::ParamTaken;
                        current.param_child?
                    }
                    AfterSplat::No => current.param_child?,
                },
                Segment::Splat => {
                    after_splat = AfterSplat::Splat;
                    current.splat_child?
                }
                segment @ (Segment::Static(_) | Segment::Alternation(_)) => {
                    after_splat = AfterSplat::No;
                    segment
                        .literals()
                        .iter()
                        .filter_map(|l| current.static_child(l))
                        .last()?
                }
            };
        }
        Some(node)
    }

    /// Resolve a request path for `method`.
    ///
    /// Returns `None` when no route matches, when the path matches but not
    /// for this method, or when a gate on the way rejects. The reason is
    /// logged at debug level but not returned.
    #[must_use]
    pub fn find(&self, path: &str, method: &Method) -> Option<RouteMatch<H, O>> {
        debug!(method = %method, path = %path, "Route match attempt");
        let start = Instant::now();
        let result = self.lookup(path, method);
        let elapsed = start.elapsed();

        match result {
            Ok(found) => {
                if elapsed > self.slow_match {
                    warn!(
                        method = %method,
                        path = %path,
                        route_pattern = %found.route.path,
                        duration_us = elapsed.as_micros(),
                        "Slow route matching detected"
                    );
                } else {
                    debug!(
                        method = %method,
                        path = %path,
                        route_pattern = %found.route.path,
                        path_params = ?found.params,
                        duration_us = elapsed.as_micros(),
                        "Route matched"
                    );
                }
                Some(found)
            }
            Err(miss) => {
                debug!(
                    method = %method,
                    path = %path,
                    reason = miss.as_str(),
                    duration_us = elapsed.as_micros(),
                    "No route matched"
                );
                None
            }
        }
    }

    /// The segment walk. States are "normal" and "inside a splat".
    fn lookup(&self, path: &str, method: &Method) -> Result<RouteMatch<H, O>, Miss> {
        let mut node = NodeId::ROOT;
        let mut values: Vec<String> = Vec::new();
        let mut in_splat = false;
        let mut leftovers: Vec<String> = Vec::new();
        // Position in `values` where the splat's trailing params belong
        let mut splat_at = 0;

        for segment in segmentize(path) {
            if !in_splat {
                let current = self.arena.get(node).ok_or(Miss::NoPath)?;
                if let Some(next) = current.static_child(segment) {
                    node = next;
                } else if let Some(next) = current.param_child {
                    values.push(segment.to_string());
                    node = next;
                } else if let Some(next) = current.splat_child {
                    node = next;
                    in_splat = true;
                    if leftovers.is_empty() {
                        splat_at = values.len();
                    }
                } else {
                    return Err(Miss::NoPath);
                }
            }

            // The segment that enters a splat is checked here too, so a
            // static continuation right after the splat matches at once.
            if in_splat {
                let splat = self.arena.get(node).ok_or(Miss::NoPath)?;
                let via_param = splat
                    .param_child
                    .and_then(|p| self.arena.get(p))
                    .and_then(|p| p.static_child(segment));
                if let Some(next) = splat.static_child(segment) {
                    in_splat = false;
                    node = next;
                    leftovers.clear();
                } else if let Some(next) = via_param {
                    in_splat = false;
                    node = next;
                } else if splat.param_child.is_some() {
                    leftovers.push(segment.to_string());
                }
            }

            let current = self.arena.get(node).ok_or(Miss::NoPath)?;
            if !current.middleware.is_empty() && !run_chain(&current.middleware, &values) {
                return Err(Miss::MiddlewareRejected);
            }
        }

        if !leftovers.is_empty() {
            node = resolve_trailing(&self.arena, node, method, &mut values, &leftovers, splat_at)
                .ok_or(Miss::NoMethod)?;
        }

        let target = self.arena.get(node).ok_or(Miss::NoPath)?;
        let route = match target.route(method) {
            Some(route) => route,
            None if target.routes.is_empty() => return Err(Miss::NoPath),
            None => return Err(Miss::NoMethod),
        };

        Ok(RouteMatch {
            route: Arc::clone(route),
            params: map_params(&route.params, &values),
            splat: leftovers,
            matched: true,
        })
    }

    /// Every registered route with its method.
    ///
    /// Alternation shares nodes, so each route appears once however many
    /// literals lead to it. Order is unspecified.
    pub fn routes(&self) -> impl Iterator<Item = &Arc<Route<H, O>>> {
        self.arena.iter().flat_map(|node| node.routes.values())
    }

    /// Log every registered route at info level.
    pub fn dump_routes(&self) {
        info!(routes_count = self.route_count, nodes = self.arena.len(), "Routing table");
        let mut routes: Vec<_> = self.routes().collect();
        routes.sort_by(|a, b| a.path.cmp(&b.path).then_with(|| a.method.as_str().cmp(b.method.as_str())));
        for route in routes {
            info!(method = %route.method, path = %route.path, params = ?route.params, "Route");
        }
    }
}
