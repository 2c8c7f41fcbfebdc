//! Positional parameter binding and splat tail resolution
//!
//! A pattern such as `/files/*/:name` records `name` as a route parameter,
//! but the tree has no fixed depth for it: the splat may swallow any number of
//! segments. While a lookup is inside a splat whose node has a parameter
//! child, every absorbed segment is kept as a leftover. Once the walk ends the
//! route that would serve the request is chosen and the parameters it still
//! lacks are taken from the tail of those leftovers.
//!
//! Kept apart from the main walk so the slicing rules can be tested on
//! their own.

use http::Method;
use std::sync::Arc;

use super::core::ParamVec;
use super::trie::{Arena, NodeId};

/// Bind parameter names to values by position.
///
/// Names without a value are left out; when a name repeats, both pairs are
/// kept and lookups return the later one.
#[must_use]
pub fn map_params(names: &[Arc<str>], values: &[String]) -> ParamVec {
    names
        .iter()
        .zip(values.iter())
        .map(|(name, value)| (Arc::clone(name), value.clone()))
        .collect()
}

/// The leftovers that fill a route's missing trailing parameters.
///
/// `route_params` is how many names the chosen route declares and `collected`
/// how many values the walk has already bound. The result is the last
/// `route_params - collected` leftovers, or all of them when fewer exist.
#[must_use]
pub(crate) fn trailing_values(route_params: usize, collected: usize, leftovers: &[String]) -> &[String] {
    let wanted = route_params.saturating_sub(collected);
    let take = wanted.min(leftovers.len());
    &leftovers[leftovers.len() - take..]
}

/// Pick the node that serves a lookup which ended inside a splat.
///
/// The node itself wins when it has a route for `method`; otherwise its
/// parameter child is used. Returns `None` when neither carries a route.
pub(crate) fn select_trailing_node<H, O>(
    arena: &Arena<H, O>,
    node: NodeId,
    method: &Method,
) -> Option<(NodeId, usize)> {
    let current = arena.get(node)?;
    if let Some(route) = current.route(method) {
        return Some((node, route.params.len()));
    }
    let child = current.param_child?;
    let route = arena.get(child)?.route(method)?;
    Some((child, route.params.len()))
}

/// Resolve trailing parameters for a lookup that ended with leftovers.
///
/// The matching leftovers are inserted into `values` at `splat_at`, the
/// number of values bound before the walk entered the splat, so parameters
/// bound after a static continuation keep their later positions. Returns the
/// node whose route should serve the request.
pub(crate) fn resolve_trailing<H, O>(
    arena: &Arena<H, O>,
    node: NodeId,
    method: &Method,
    values: &mut Vec<String>,
    leftovers: &[String],
    splat_at: usize,
) -> Option<NodeId> {
    let (target, declared) = select_trailing_node(arena, node, method)?;
    let tail = trailing_values(declared, values.len(), leftovers);
    insert_at(values, splat_at, tail);
    Some(target)
}

/// Insert `tail` into `values` at `at`, clamped to the end.
fn insert_at(values: &mut Vec<String>, at: usize, tail: &[String]) {
    let rest = values.split_off(at.min(values.len()));
    values.extend(tail.iter().cloned());
    values.extend(rest);
}
