//! # trierouter
//!
//! **trierouter** is a URL-path router built on a segment trie. Given a set
//! of `(method, pattern, handler)` registrations it resolves an incoming
//! `(path, method)` pair to the handler and binds the named parameters.
//! It performs no network I/O; an HTTP server calls into it.
//!
//! ## Architecture
//!
//! - **[`segment`]** - path segmenter and pattern token classification
//! - **[`router`]** - the trie, registration and resolution
//! - **[`middleware`]** - gates run during descent and sub-router plugins
//! - **[`shared`]** - lock-free handle for serving a frozen router across threads
//! - **[`table`]** - TOML/JSON route tables
//! - **[`runtime_config`]** / **[`logging`]** - environment configuration and tracing setup
//! - **[`cli`]** - the `trierouter` command line
//!
//! ### Request Resolution Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Server as HTTP server
//!     participant Router
//!     participant Seg as segmentize
//!     participant Trie as Trie nodes
//!     participant Gate as Middleware gates
//!
//!     Server->>Router: find("/files/a/b/c.txt", GET)
//!     Router->>Seg: split, drop query
//!     Seg-->>Router: ["files", "a", "b", "c.txt"]
//!     loop each segment
//!         Router->>Trie: static child? param child? splat child?
//!         Trie-->>Router: next node
//!         Router->>Gate: run gates on node
//!         alt gate rejects
//!             Gate-->>Server: None
//!         end
//!     end
//!     Router->>Router: bind splat tail to trailing params
//!     Router->>Trie: route for GET
//!     Router-->>Server: RouteMatch { handler, params, splat }
//! ```
//!
//! ## Pattern Syntax
//!
//! | Segment   | Meaning                                                     |
//! |-----------|-------------------------------------------------------------|
//! | `users`   | static, matched exactly                                     |
//! | `:id`     | parameter, matches any one segment                          |
//! | `*`       | splat, matches segments until a more specific continuation  |
//! | `a\|b`    | alternation, each literal reaches the same subtree          |
//!
//! Parameters right after a splat (`/files/*/:dir/:name`) are bound from the
//! end of the segments the splat absorbed. There is no escaping, so a static
//! segment cannot contain a literal `:`, `*` or `|` in those positions.
//!
//! ## Quick Start
//!
//! ```rust
//! use trierouter::router::Router;
//! use http::Method;
//!
//! let mut router = Router::new();
//! router.any_of(&[Method::GET, Method::HEAD], "/pets", "list_pets", None).unwrap();
//! router.add_route(Method::GET, "/pets/:id", "get_pet", None).unwrap();
//! router.add_route(Method::GET, "/static/*", "assets", None).unwrap();
//!
//! let m = router.find("/pets/42?verbose=1", &Method::GET).unwrap();
//! assert_eq!(*m.handler(), "get_pet");
//! assert_eq!(m.param("id"), Some("42"));
//!
//! assert!(router.find("/pets/42", &Method::POST).is_none());
//! assert!(router.add_route(Method::GET, "/pets/:pet_id", "dup", None).is_err());
//! ```
//!
//! ## Failure Model
//!
//! Registration errors ([`RouteError`]) are returned synchronously from the
//! call that caused them. Resolution never errors: `find` returns `None` when
//! the path does not match, when it matches only for other methods, or when a
//! gate rejects.

pub mod cli;
pub mod error;
pub mod logging;
pub mod middleware;
pub mod router;
pub mod runtime_config;
pub mod segment;
pub mod shared;
pub mod table;

pub use error::RouteError;
pub use middleware::{Middleware, MountPoint, Plugin, PluginResult};
pub use router::{NodeId, ParamVec, Route, RouteMatch, Router};
pub use segment::segmentize;
pub use shared::SharedRouter;
