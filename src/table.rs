//! # Route Tables
//!
//! Declarative route definitions loaded from TOML or JSON and registered
//! into a [`Router<String>`] whose handlers are handler names.
//!
//! ```toml
//! [[routes]]
//! methods = ["GET", "HEAD"]
//! path = "/users/:id"
//! handler = "get_user"
//!
//! [[routes]]
//! methods = ["GET"]
//! path = "/files/*/:name"
//! handler = "get_file"
//!
//! [[middleware]]
//! path = "/admin"
//! deny = true
//! ```
//!
//! Files ending in `.toml` are parsed as TOML, everything else as JSON.

use anyhow::{Context, Result};
use http::Method;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::middleware::{Allow, Deny};
use crate::router::Router;
use crate::runtime_config::RouterConfig;

/// One `[[routes]]` entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteEntry {
    pub methods: Vec<String>,
    pub path: String,
    pub handler: String,
}

/// One `[[middleware]]` entry: a fixed allow or deny gate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateEntry {
    pub path: String,
    #[serde(default)]
    pub deny: bool,
}

/// A complete route table file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteTable {
    #[serde(default)]
    pub routes: Vec<RouteEntry>,
    #[serde(default)]
    pub middleware: Vec<GateEntry>,
}

impl RouteTable {
    /// Read a table from disk, choosing the parser by extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read route table {}", path.display()))?;
        let is_toml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
        let table = if is_toml {
            Self::from_toml_str(&content)
        } else {
            Self::from_json_str(&content)
        };
        table.with_context(|| format!("failed to parse route table {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Register every entry into a fresh router.
    ///
    /// Gates are attached before routes so their order does not depend on
    /// the file layout.
    pub fn build(&self, config: &RouterConfig) -> Result<Router<String>> {
        let mut router = Router::with_config(config);

        for gate in &self.middleware {
            let result = if gate.deny {
                router.use_middleware(&gate.path, Deny)
            } else {
                router.use_middleware(&gate.path, Allow)
            };
            result.with_context(|| format!("invalid middleware path {}", gate.path))?;
        }

        for entry in &self.routes {
            let methods = parse_methods(&entry.methods)
                .with_context(|| format!("invalid methods for {}", entry.path))?;
            router
                .any_of(&methods, &entry.path, entry.handler.clone(), None)
                .with_context(|| format!("failed to register {} ({})", entry.path, entry.handler))?;
        }

        info!(
            routes_count = router.len(),
            gates_count = self.middleware.len(),
            nodes = router.node_count(),
            "Routing table loaded"
        );
        Ok(router)
    }
}

/// Parse method names, upper-casing them first.
pub fn parse_methods(names: &[String]) -> Result<Vec<Method>> {
    if names.is_empty() {
        anyhow::bail!("at least one method is required");
    }
    names
        .iter()
        .map(|name| {
            Method::from_bytes(name.trim().to_ascii_uppercase().as_bytes())
                .with_context(|| format!("invalid HTTP method {name:?}"))
        })
        .collect()
}

/// Load a table file and build its router.
pub fn load_router(path: impl AsRef<Path>, config: &RouterConfig) -> Result<Router<String>> {
    RouteTable::from_path(path)?.build(config)
}
