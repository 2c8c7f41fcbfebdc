//! # Router Module
//!
//! The router module stores registered routes in a segment trie and resolves
//! request paths against it.
//!
//! ## Overview
//!
//! The router is responsible for:
//! - Building the tree from `(method, pattern, handler)` registrations
//! - Resolving `(path, method)` pairs to the registered handler
//! - Binding parameter values to the names the pattern declared
//! - Running middleware gates attached along the way
//!
//! ## Architecture
//!
//! 1. **Registration**: each pattern is split into segments and walked from
//!    the root, creating static, parameter and splat children as needed.
//!    Alternation segments (`a|b`) bind every literal to one shared node.
//!
//! 2. **Matching**: the request path is walked against the same tree. Static
//!    children win over the parameter child, which wins over the splat child.
//!    There is no backtracking across siblings; the only look-ahead is the
//!    splat tail resolution in [`splat`](self::splat).
//!
//! ## Example
//!
//! ```rust
//! use trierouter::router::Router;
//! use http::Method;
//!
//! let mut router = Router::new();
//! router.add_route(Method::GET, "/files/*/:name", "file", None).unwrap();
//! router.add_route(Method::GET, "/or/ping|pong", "either", None).unwrap();
//!
//! let m = router.find("/files/a/b/report.pdf", &Method::GET).unwrap();
//! assert_eq!(m.param("name"), Some("report.pdf"));
//!
//! assert_eq!(router.find("/or/pong", &Method::GET).unwrap().path(), "/or/ping|pong");
//! assert!(router.find("/or/pang", &Method::GET).is_none());
//! ```

mod core;
mod splat;
mod trie;
#[cfg(test)]
mod tests;

pub use self::core::{ParamVec, Route, RouteMatch, Router, MAX_INLINE_PARAMS};
pub use self::splat::map_params;
pub use self::trie::NodeId;
