//! # CLI Module
//!
//! Command-line access to route tables: list them, validate them and resolve
//! single requests against them.
//!
//! ## Commands
//!
//! ### `routes`
//!
//! ```bash
//! trierouter routes --table routes.toml
//! ```
//!
//! Prints every registered route as `METHOD pattern -> handler`, sorted.
//!
//! ### `find`
//!
//! ```bash
//! trierouter find --table routes.toml --method GET /users/42
//! ```
//!
//! Prints the match as JSON (`handler`, `path`, `params`, `splat`). Exits
//! with status 1 when nothing matches.
//!
//! ### `check`
//!
//! ```bash
//! trierouter check --table routes.toml
//! ```
//!
//! Builds the router and reports duplicate routes or malformed entries.
//!
//! Logging is configured through the `TRIEROUTER_*` environment variables
//! (see [`runtime_config`](crate::runtime_config)); `--verbose` raises the
//! level to debug.

mod commands;


pub use commands::{run_cli, Cli, Commands};
