//! Registration errors.
//!
//! Resolution never fails with an error: a miss is an ordinary `None` from
//! [`Router::find`](crate::router::Router::find). Everything here is raised
//! synchronously while routes are being registered.

use http::Method;
use thiserror::Error;

use crate::router::NodeId;

/// Errors raised while registering routes, middleware or plugins
#[derive(Debug, Error)]
pub enum RouteError {
    /// The (method, node) pair already carries a route.
    ///
    /// Two patterns that differ only in parameter names land on the same
    /// node, so `/x/:a` and `/x/:b` collide.
    #[error("Duplicate route: {method} {path}")]
    DuplicateRoute { method: Method, path: String },

    /// An alternation segment such as `a||b` or `a|` contains an empty literal.
    #[error("empty alternative in pattern segment of {path}")]
    EmptyAlternative { path: String },

    /// `add_route_at` was given an index that does not belong to this router.
    #[error("node {0:?} does not exist in this router")]
    UnknownNode(NodeId),

    /// A mounted plugin failed while installing itself.
    #[error("plugin mounted at {path} failed: {source}")]
    Plugin {
        path: String,
        #[source]
        source: anyhow::Error,
    },
}
