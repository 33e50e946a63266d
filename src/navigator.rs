//! Directional search over the node graph.
//!
//! Traversal order is pre-order when moving [`Direction::Forward`] and the exact reverse of
//! pre-order when moving [`Direction::Backward`], so a forward walk and a backward walk over the
//! same subtree visit nodes in mirrored sequence. Every walk is iterative: each step is computed
//! from sibling and parent links, so arbitrarily deep trees never grow the call stack.
//!
//! Searches are bounded by a root predicate. The walk never leaves the nearest node at or above
//! the starting point that satisfies it, and falls back to the top of the tree when no such node
//! exists.

use crate::predicates;
use crate::tree::Node;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::trace;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Which way a traversal or movement proceeds.
pub enum Direction {
    /// Document order.
    Forward,
    /// Reverse document order.
    Backward,
}

impl Direction {
    #[must_use]
    /// The opposite direction.
    pub fn reversed(self) -> Self {
        match self {
            Self::Forward => Self::Backward,
            Self::Backward => Self::Forward,
        }
    }
}

#[derive(Clone, Copy)]
/// Restrictions applied by [`find_next`].
pub struct FindOptions {
    /// Never report an ancestor of the starting node as a match.
    pub skip_ancestry: bool,
    /// Bounds the walk to the nearest node at or above the start matching it.
    pub root: fn(Node<'_>) -> bool,
    /// Never descend into a node that matches and is not a container.
    pub atomic_matches: bool,
}

impl Default for FindOptions {
    fn default() -> Self {
        Self {
            skip_ancestry: false,
            root: predicates::is_root,
            atomic_matches: false,
        }
    }
}

impl FindOptions {
    #[must_use]
    /// Default restrictions with ancestors of the start excluded.
    pub fn skipping_ancestry() -> Self {
        Self {
            skip_ancestry: true,
            ..Self::default()
        }
    }

    #[must_use]
    /// Treat matching non-containers as single units, for leaf and object movement.
    pub fn atomic(mut self) -> Self {
        self.atomic_matches = true;
        self
    }

    #[must_use]
    /// Replace the root predicate.
    pub fn within(mut self, root: fn(Node<'_>) -> bool) -> Self {
        self.root = root;
        self
    }
}

/// Nearest node at or above `node` satisfying `pred`.
pub fn nearest_ancestor<'t>(node: Node<'t>, pred: impl Fn(Node<'t>) -> bool) -> Option<Node<'t>> {
    std::iter::once(node).chain(node.ancestors()).find(|n| pred(*n))
}

/// Topmost ancestor of `node`, or `node` itself when it has no parent.
fn topmost(node: Node<'_>) -> Node<'_> {
    node.ancestors().last().unwrap_or(node)
}

/// Root a search from `node` is confined to.
pub fn search_root<'t>(node: Node<'t>, root: fn(Node<'_>) -> bool) -> Node<'t> {
    nearest_ancestor(node, root).unwrap_or_else(|| topmost(node))
}

/// Next node after `node` in pre-order inside `root`, without descending into `opaque` nodes.
fn next_pre<'t>(root: Node<'t>, node: Node<'t>, opaque: &dyn Fn(Node<'t>) -> bool) -> Option<Node<'t>> {
    if !opaque(node) {
        if let Some(child) = node.first_child() {
            return Some(child);
        }
    }
    let mut cur = node;
    loop {
        if cur == root {
            return None;
        }
        if let Some(sibling) = cur.next_sibling() {
            return Some(sibling);
        }
        cur = cur.parent()?;
    }
}

/// Previous node before `node` in pre-order inside `root`, without descending into `opaque`
/// nodes.
fn prev_pre<'t>(root: Node<'t>, node: Node<'t>, opaque: &dyn Fn(Node<'t>) -> bool) -> Option<Node<'t>> {
    if node == root {
        return None;
    }
    let Some(sibling) = node.previous_sibling() else {
        return node.parent();
    };
    let mut cur = sibling;
    while !opaque(cur) {
        match cur.last_child() {
            Some(child) => cur = child,
            None => break,
        }
    }
    Some(cur)
}

fn step<'t>(
    root: Node<'t>,
    node: Node<'t>,
    dir: Direction,
    opaque: &dyn Fn(Node<'t>) -> bool,
) -> Option<Node<'t>> {
    match dir {
        Direction::Forward => next_pre(root, node, opaque),
        Direction::Backward => prev_pre(root, node, opaque),
    }
}

/// Walks a subtree in pre-order or reverse pre-order.
pub struct Traversal<'t> {
    root: Node<'t>,
    dir: Direction,
    next: Option<Node<'t>>,
}

impl<'t> Traversal<'t> {
    #[must_use]
    /// Traverse every node of `root`'s subtree, `root` included.
    pub fn new(root: Node<'t>, dir: Direction) -> Self {
        let first = match dir {
            Direction::Forward => root,
            Direction::Backward => descend(root, Direction::Backward, |n| n.first_child().is_none()),
        };
        Self {
            root,
            dir,
            next: Some(first),
        }
    }
}

impl<'t> Iterator for Traversal<'t> {
    type Item = Node<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        let cur = self.next?;
        self.next = step(self.root, cur, self.dir, &|_: Node<'t>| false);
        Some(cur)
    }
}

/// First node of `root`'s subtree matching `pred`, walking pre-order forward or reverse
/// pre-order backward. `root` itself is eligible.
pub fn find_first<'t>(
    root: Node<'t>,
    dir: Direction,
    pred: impl Fn(Node<'t>) -> bool,
) -> Option<Node<'t>> {
    Traversal::new(root, dir).find(|n| pred(*n))
}

/// Last node of `root`'s subtree matching `pred` in the traversal order of `dir`.
pub fn find_last<'t>(
    root: Node<'t>,
    dir: Direction,
    pred: impl Fn(Node<'t>) -> bool,
) -> Option<Node<'t>> {
    find_first(root, dir.reversed(), pred)
}

/// First node strictly after `start` in traversal order satisfying `pred`.
///
/// The walk is strict pre-order forward and strict reverse pre-order backward, so no match lies
/// between `start` and the result. With [`FindOptions::atomic_matches`], matching non-containers
/// are not descended into and the outermost match wins. With [`FindOptions::skip_ancestry`], the
/// nodes enclosing `start` are never reported.
pub fn find_next<'t>(
    start: Node<'t>,
    dir: Direction,
    pred: impl Fn(Node<'t>) -> bool,
    opts: FindOptions,
) -> Option<Node<'t>> {
    let root = search_root(start, opts.root);
    trace!(?start, ?root, ?dir, "find_next");
    let ancestry: HashSet<_> = if opts.skip_ancestry {
        start.ancestors().map(Node::id).collect()
    } else {
        HashSet::new()
    };
    let opaque = |n: Node<'t>| opts.atomic_matches && pred(n) && !predicates::is_container(n);
    let mut cur = start;
    while let Some(next) = step(root, cur, dir, &opaque) {
        if !ancestry.contains(&next.id()) && pred(next) {
            return Some(next);
        }
        cur = next;
    }
    None
}

fn descend<'t>(node: Node<'t>, dir: Direction, stop: impl Fn(Node<'t>) -> bool) -> Node<'t> {
    let mut cur = node;
    while !stop(cur) {
        let child = match dir {
            Direction::Forward => cur.first_child(),
            Direction::Backward => cur.last_child(),
        };
        match child {
            Some(child) => cur = child,
            None => break,
        }
    }
    cur
}

/// Descend from `node` to its first (forward) or last (backward) leaf descendant. A leaf passed
/// in is returned unchanged.
#[must_use]
pub fn find_leaf_descendant(node: Node<'_>, dir: Direction) -> Node<'_> {
    descend(node, dir, predicates::is_leaf)
}

/// Reduce a coarse match to a concrete position: containers are replaced by their first or last
/// leaf, everything else is kept.
#[must_use]
pub fn normalize(node: Node<'_>, dir: Direction) -> Node<'_> {
    if predicates::is_container(node) {
        find_leaf_descendant(node, dir)
    } else {
        node
    }
}

#[cfg(test)]
#[path = "tests/navigator.rs"]
mod tests;
