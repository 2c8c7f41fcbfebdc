//! Arena-backed segment trie
//!
//! Every node lives in a single `Vec` owned by the router and is addressed by
//! a [`NodeId`]. Alternation segments bind several literal keys to the same
//! index, so the subtree below `a|b` exists exactly once and both literals see
//! every later registration made through either of them.
//!
//! ## Node shape
//!
//! - Static children are keyed by exact segment text
//! - At most one parameter child per node; matching is structural, so `:id`
//!   and `:user_id` at the same depth share it
//! - At most one splat child per node
//! - Routes are stored per HTTP method, at most one each
//! - Middleware gates run in registration order whenever a lookup passes through

use http::Method;
use std::collections::HashMap;
use std::sync::Arc;

use crate::middleware::MiddlewareEntry;

use super::core::Route;

/// Index of a node in the router's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// The root node of every router.
    pub const ROOT: NodeId = NodeId(0);

    /// Raw arena index.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// One level of the route tree
pub(crate) struct TrieNode<H, O> {
    pub(crate) static_children: HashMap<String, NodeId>,
    pub(crate) param_child: Option<NodeId>,
    pub(crate) splat_child: Option<NodeId>,
    pub(crate) routes: HashMap<Method, Arc<Route<H, O>>>,
    pub(crate) middleware: Vec<MiddlewareEntry>,
}

impl<H, O> TrieNode<H, O> {
    pub(crate) fn new() -> Self {
        Self {
            static_children: HashMap::new(),
            param_child: None,
            splat_child: None,
            routes: HashMap::new(),
            middleware: Vec::new(),
        }
    }

    #[inline]
    pub(crate) fn static_child(&self, segment: &str) -> Option<NodeId> {
        self.static_children.get(segment).copied()
    }

    #[inline]
    pub(crate) fn route(&self, method: &Method) -> Option<&Arc<Route<H, O>>> {
        self.routes.get(method)
    }
}

/// The node arena. Node 0 is always the root.
pub(crate) struct Arena<H, O> {
    nodes: Vec<TrieNode<H, O>>,
}

impl<H, O> Arena<H, O> {
    pub(crate) fn new() -> Self {
        Self {
            nodes: vec![TrieNode::new()],
        }
    }

    pub(crate) fn alloc(&mut self) -> NodeId {
        self.nodes.push(TrieNode::new());
        NodeId(self.nodes.len() - 1)
    }

    pub(crate) fn get(&self, id: NodeId) -> Option<&TrieNode<H, O>> {
        self.nodes.get(id.0)
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut TrieNode<H, O>> {
        self.nodes.get_mut(id.0)
    }

    pub(crate) fn contains(&self, id: NodeId) -> bool {
        id.0 < self.nodes.len()
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &TrieNode<H, O>> {
        self.nodes.iter()
    }

    /// Return the parameter child of `id`, creating it on first use.
    pub(crate) fn param_child_or_insert(&mut self, id: NodeId) -> NodeId {
        if let Some(child) = self.nodes[id.0].param_child {
            return child;
        }
        let child = self.alloc();
        self.nodes[id.0].param_child = Some(child);
        child
    }

    /// Return the splat child of `id`, creating it on first use.
    pub(crate) fn splat_child_or_insert(&mut self, id: NodeId) -> NodeId {
        if let Some(child) = self.nodes[id.0].splat_child {
            return child;
        }
        let child = self.alloc();
        self.nodes[id.0].splat_child = Some(child);
        child
    }

    /// Bind every literal to one shared child of `id` and return it.
    ///
    /// A literal that already has a child makes that child the target for the
    /// literals that follow it; a literal with no child is bound to the
    /// current target, which is allocated the first time it is needed. When
    /// an earlier literal was unbound and a later one was already bound the
    /// two end up on different nodes, and the later node is returned.
    pub(crate) fn bind_literals(&mut self, id: NodeId, literals: &[&str]) -> NodeId {
        let mut target = None;
        for literal in literals {
            match self.nodes[id.0].static_child(literal) {
                Some(existing) => target = Some(existing),
                None => {
                    let child = match target {
                        Some(child) => child,
                        None => {
                            let child = self.alloc();
                            target = Some(child);
                            child
                        }
                    };
                    self.nodes[id.0]
                        .static_children
                        .insert((*literal).to_string(), child);
                }
            }
        }
        // literals is never empty: `split` always yields at least one item
        target.unwrap_or(id)
    }
}
