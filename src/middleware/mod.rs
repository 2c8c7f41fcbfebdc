//! # Middleware Module
//!
//! Gates that run while a lookup descends the route tree, plus the plugin
//! hook used to mount a sub-router below a path prefix.
//!
//! ## Gates
//!
//! A [`Middleware`] is attached to the node a pattern resolves to. Every
//! lookup that passes through that node runs the node's gates in
//! registration order. Each gate receives the parameters its own mount
//! pattern declared (bound to the values collected so far) and the value the
//! previous gate returned. A falsy result (`None`, `null` or `false`) aborts
//! the lookup, which then reports no match.
//!
//! ```rust
//! use trierouter::router::{ParamVec, Router};
//! use http::Method;
//! use serde_json::Value;
//!
//! let mut router: Router<&str> = Router::new();
//! router.add_route(Method::GET, "/admin/stats", "stats", None).unwrap();
//! router
//!     .use_middleware("/admin", |_: &ParamVec, _: Option<&Value>| -> Option<Value> { None })
//!     .unwrap();
//!
//! assert!(router.find("/admin/stats", &Method::GET).is_none());
//! ```
//!
//! ## Plugins
//!
//! [`Router::mount`](crate::router::Router::mount) hands a [`Plugin`] the
//! router and a [`MountPoint`] at registration time. The plugin can register
//! routes relative to the mount node and may return a gate to attach there.

mod core;

pub use core::{Allow, Deny, Middleware, MountPoint, Plugin, PluginResult};
pub(crate) use core::{run_chain, MiddlewareEntry};
