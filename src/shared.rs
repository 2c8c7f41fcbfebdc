//! Lock-free shared router handle
//!
//! A [`Router`] is filled through `&mut` and then frozen into a
//! [`SharedRouter`]. Readers on any thread load the current table without
//! locking; a new table can be swapped in as a whole, and lookups already in
//! flight keep the table they started with.
//!
//! ```rust
//! use trierouter::router::Router;
//! use trierouter::shared::SharedRouter;
//! use http::Method;
//!
//! let mut v1 = Router::new();
//! v1.add_route(Method::GET, "/health", "v1", None).unwrap();
//! let shared = SharedRouter::new(v1);
//!
//! let mut v2 = Router::new();
//! v2.add_route(Method::GET, "/health", "v2", None).unwrap();
//! shared.replace(v2);
//!
//! assert_eq!(*shared.find("/health", &Method::GET).unwrap().handler(), "v2");
//! ```

use arc_swap::ArcSwap;
use http::Method;
use std::sync::Arc;
use tracing::info;

use crate::router::{RouteMatch, Router};

/// A frozen router shared across threads
pub struct SharedRouter<H, O = ()> {
    current: ArcSwap<Router<H, O>>,
}

impl<H, O> SharedRouter<H, O> {
    /// Freeze `router`. No routes can be added through the handle.
    pub fn new(router: Router<H, O>) -> Self {
        Self {
            current: ArcSwap::from_pointee(router),
        }
    }

    /// Resolve against the current table.
    #[must_use]
    pub fn find(&self, path: &str, method: &Method) -> Option<RouteMatch<H, O>> {
        self.current.load().find(path, method)
    }

    /// The current table. Holding it keeps that version alive.
    #[must_use]
    pub fn snapshot(&self) -> Arc<Router<H, O>> {
        self.current.load_full()
    }

    /// Atomically replace the table, returning the previous one.
    pub fn replace(&self, router: Router<H, O>) -> Arc<Router<H, O>> {
        let routes = router.len();
        let previous = self.current.swap(Arc::new(router));
        info!(
            routes_count = routes,
            previous_routes_count = previous.len(),
            "Routing table replaced"
        );
        previous
    }
}

impl<H, O> From<Router<H, O>> for SharedRouter<H, O> {
    fn from(router: Router<H, O>) -> Self {
        Self::new(router)
    }
}
