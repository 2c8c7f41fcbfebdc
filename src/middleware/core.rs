use serde_json::Value;
use std::sync::Arc;

use crate::router::{map_params, NodeId, ParamVec, Router};

/// A gate consulted while a lookup passes through the node it is attached to
pub trait Middleware: Send + Sync {
    /// Return a truthy value to let the lookup continue.
    ///
    /// `previous` is `None` for the first gate of a node and the previous
    /// gate's result afterwards.
    fn call(&self, params: &ParamVec, previous: Option<&Value>) -> Option<Value>;
}

impl<F> Middleware for F
where
    F: Fn(&ParamVec, Option<&Value>) -> Option<Value> + Send + Sync,
{
    fn call(&self, params: &ParamVec, previous: Option<&Value>) -> Option<Value> {
        self(params, previous)
    }
}

/// Gate that always passes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Allow;

impl Middleware for Allow {
    fn call(&self, _params: &ParamVec, _previous: Option<&Value>) -> Option<Value> {
        Some(Value::Bool(true))
    }
}

/// Gate that always rejects.
#[derive(Debug, Clone, Copy, Default)]
pub struct Deny;

impl Middleware for Deny {
    fn call(&self, _params: &ParamVec, _previous: Option<&Value>) -> Option<Value> {
        None
    }
}

/// Where a plugin or gate was mounted
#[derive(Debug, Clone)]
pub struct MountPoint<O = ()> {
    /// Node the mount pattern resolved to
    pub node: NodeId,
    /// The mount pattern as written
    pub path: String,
    /// Parameter names declared by the mount pattern, in order
    pub params: Vec<Arc<str>>,
    /// Options passed through from `mount`
    pub options: Option<O>,
}

/// What a plugin hands back: an optional gate for its mount node.
pub type PluginResult = anyhow::Result<Option<Box<dyn Middleware>>>;

/// A sub-router installed below a mount point
///
/// Runs once, during [`Router::mount`]. Routes added with
/// [`Router::add_route_at`] using `at.node` as the base become reachable
/// below the mount prefix.
pub trait Plugin<H, O = ()> {
    fn install(self, router: &mut Router<H, O>, at: &MountPoint<O>) -> PluginResult;
}

impl<H, O, F> Plugin<H, O> for F
where
    F: FnOnce(&mut Router<H, O>, &MountPoint<O>) -> PluginResult,
{
    fn install(self, router: &mut Router<H, O>, at: &MountPoint<O>) -> PluginResult {
        self(router, at)
    }
}

/// A gate together with the parameter names of the pattern it was mounted on
pub(crate) struct MiddlewareEntry {
    pub(crate) params: Vec<Arc<str>>,
    pub(crate) gate: Box<dyn Middleware>,
}

/// `None`, `null` and `false` reject; everything else passes.
#[inline]
pub(crate) fn is_falsy(value: Option<&Value>) -> bool {
    matches!(value, None | Some(Value::Null) | Some(Value::Bool(false)))
}

/// Run a node's gates in order. Returns `false` as soon as one rejects.
pub(crate) fn run_chain(entries: &[MiddlewareEntry], values: &[String]) -> bool {
    let mut previous: Option<Value> = None;
    for entry in entries {
        let params = map_params(&entry.params, values);
        let result = entry.gate.call(&params, previous.as_ref());
        if is_falsy(result.as_ref()) {
            return false;
        }
        previous = result;
    }
    true
}
