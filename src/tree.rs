//! The node graph navigation runs over.
//!
//! A `Tree` is an arena of nodes linked by parent, first/last child and previous/next sibling so
//! every structural query is constant time. The navigation core only ever reads it through the
//! borrowed [`Node`] handle; hosts grow it with [`Tree::append`] and prune it with
//! [`Tree::detach`] between navigation computations. Detached nodes stay addressable so a stale
//! [`NodeId`] can be recognised instead of dangling.

use crate::role::Role;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
/// Stable index of a node inside its [`Tree`].
pub struct NodeId(usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

fn one() -> usize {
    1
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Grid coordinates of a table cell, with spans for merged cells.
pub struct CellCoords {
    /// Zero-based index of the first row the cell occupies.
    pub row: usize,
    /// Zero-based index of the first column the cell occupies.
    pub col: usize,
    /// Number of rows the cell covers.
    #[serde(default = "one")]
    pub row_span: usize,
    /// Number of columns the cell covers.
    #[serde(default = "one")]
    pub col_span: usize,
}

impl CellCoords {
    #[must_use]
    /// A cell covering exactly one row and one column.
    pub fn new(row: usize, col: usize) -> Self {
        Self {
            row,
            col,
            row_span: 1,
            col_span: 1,
        }
    }

    #[must_use]
    /// Last row covered by the cell.
    pub fn last_row(&self) -> usize {
        self.row + self.row_span.max(1) - 1
    }

    #[must_use]
    /// Last column covered by the cell.
    pub fn last_col(&self) -> usize {
        self.col + self.col_span.max(1) - 1
    }
}

#[derive(Clone, Debug, PartialEq)]
/// Attributes of a single node, independent of where it sits in the tree.
pub struct NodeData {
    /// Content category.
    pub role: Role,
    /// Accessible name; the text of leaves.
    pub name: String,
    /// Heading level (1 to 6) for headings.
    pub level: Option<u8>,
    /// Grid coordinates for table cells.
    pub cell: Option<CellCoords>,
    /// Whether a link target has been visited.
    pub visited: bool,
    /// Check state for check boxes and switches.
    pub checked: Option<bool>,
    /// Target of links and address of documents.
    pub url: Option<String>,
}

impl NodeData {
    #[must_use]
    /// Unnamed node of the given role.
    pub fn new(role: Role) -> Self {
        Self {
            role,
            name: String::new(),
            level: None,
            cell: None,
            visited: false,
            checked: None,
            url: None,
        }
    }

    #[must_use]
    /// Set the accessible name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    /// Set the heading level.
    pub fn with_level(mut self, level: u8) -> Self {
        self.level = Some(level);
        self
    }

    #[must_use]
    /// Set single-span cell coordinates.
    pub fn with_cell(mut self, row: usize, col: usize) -> Self {
        self.cell = Some(CellCoords::new(row, col));
        self
    }

    #[must_use]
    /// Set explicit cell coordinates, spans included.
    pub fn with_coords(mut self, coords: CellCoords) -> Self {
        self.cell = Some(coords);
        self
    }

    #[must_use]
    /// Set the link target.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    #[must_use]
    /// Mark a link as visited.
    pub fn visited(mut self) -> Self {
        self.visited = true;
        self
    }

    #[must_use]
    /// Set the check state.
    pub fn with_checked(mut self, checked: bool) -> Self {
        self.checked = Some(checked);
        self
    }
}

#[derive(Clone, Copy, Default, Debug)]
struct Links {
    parent: Option<NodeId>,
    first_child: Option<NodeId>,
    last_child: Option<NodeId>,
    prev_sibling: Option<NodeId>,
    next_sibling: Option<NodeId>,
}

#[derive(Clone, Debug)]
struct Slot {
    data: NodeData,
    links: Links,
}

#[derive(Clone, Debug)]
/// Arena holding every node of one graph snapshot.
pub struct Tree {
    slots: Vec<Slot>,
    root: NodeId,
}

impl Tree {
    #[must_use]
    /// Start a tree whose top node carries `data`.
    pub fn new(data: NodeData) -> Self {
        Self {
            slots: vec![Slot {
                data,
                links: Links::default(),
            }],
            root: NodeId(0),
        }
    }

    #[must_use]
    /// Identifier of the top node.
    pub fn root_id(&self) -> NodeId {
        self.root
    }

    #[must_use]
    /// Handle on the top node.
    pub fn root(&self) -> Node<'_> {
        Node {
            tree: self,
            id: self.root,
        }
    }

    #[must_use]
    /// Handle on `id`, or `None` if the id was never issued by this tree.
    pub fn node(&self, id: NodeId) -> Option<Node<'_>> {
        (id.0 < self.slots.len()).then_some(Node { tree: self, id })
    }

    /// Mutable attributes of `id`, for hosts updating state such as check marks between
    /// navigation computations.
    pub fn data_mut(&mut self, id: NodeId) -> Option<&mut NodeData> {
        self.slots.get_mut(id.0).map(|slot| &mut slot.data)
    }

    #[must_use]
    /// Number of nodes ever created, detached ones included.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    /// Always false: a tree has at least its top node.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Create a node as the last child of `parent` and return its id.
    ///
    /// # Panics
    ///
    /// Panics if `parent` was not issued by this tree.
    pub fn append(&mut self, parent: NodeId, data: NodeData) -> NodeId {
        assert!(parent.0 < self.slots.len(), "unknown parent {parent}");
        let id = NodeId(self.slots.len());
        let prev = self.slots[parent.0].links.last_child;
        self.slots.push(Slot {
            data,
            links: Links {
                parent: Some(parent),
                prev_sibling: prev,
                ..Links::default()
            },
        });
        match prev {
            Some(prev) => self.slots[prev.0].links.next_sibling = Some(id),
            None => self.slots[parent.0].links.first_child = Some(id),
        }
        self.slots[parent.0].links.last_child = Some(id);
        id
    }

    /// Unlink `id` (and with it its whole subtree) from its parent.
    ///
    /// The node keeps its data and children so that positions referencing it can still be
    /// inspected, but it is no longer attached to the top node.
    pub fn detach(&mut self, id: NodeId) {
        if id.0 >= self.slots.len() || id == self.root {
            return;
        }
        let links = self.slots[id.0].links;
        let Some(parent) = links.parent else {
            return;
        };
        match links.prev_sibling {
            Some(prev) => self.slots[prev.0].links.next_sibling = links.next_sibling,
            None => self.slots[parent.0].links.first_child = links.next_sibling,
        }
        match links.next_sibling {
            Some(next) => self.slots[next.0].links.prev_sibling = links.prev_sibling,
            None => self.slots[parent.0].links.last_child = links.prev_sibling,
        }
        let slot = &mut self.slots[id.0].links;
        slot.parent = None;
        slot.prev_sibling = None;
        slot.next_sibling = None;
    }

    #[must_use]
    /// Whether the parent chain of `id` still reaches the top node.
    pub fn is_attached(&self, id: NodeId) -> bool {
        if id.0 >= self.slots.len() {
            return false;
        }
        let mut cur = id;
        while let Some(parent) = self.slots[cur.0].links.parent {
            cur = parent;
        }
        cur == self.root
    }

    fn links(&self, id: NodeId) -> &Links {
        &self.slots[id.0].links
    }
}

#[derive(Clone, Copy)]
/// Borrowed, read-only handle on one node of a [`Tree`].
pub struct Node<'t> {
    tree: &'t Tree,
    id: NodeId,
}

impl PartialEq for Node<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && std::ptr::eq(self.tree, other.tree)
    }
}

impl Eq for Node<'_> {}

impl fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}", self.role(), self.id)?;
        if !self.name().is_empty() {
            write!(f, " {:?}", self.name())?;
        }
        f.write_str(")")
    }
}

impl<'t> Node<'t> {
    fn wrap(self, id: Option<NodeId>) -> Option<Node<'t>> {
        id.map(|id| Node {
            tree: self.tree,
            id,
        })
    }

    #[must_use]
    /// Identifier of the node.
    pub fn id(self) -> NodeId {
        self.id
    }

    #[must_use]
    /// Tree the node lives in.
    pub fn tree(self) -> &'t Tree {
        self.tree
    }

    #[must_use]
    /// All attributes of the node.
    pub fn data(self) -> &'t NodeData {
        &self.tree.slots[self.id.0].data
    }

    #[must_use]
    /// Content category.
    pub fn role(self) -> Role {
        self.data().role
    }

    #[must_use]
    /// Accessible name.
    pub fn name(self) -> &'t str {
        &self.data().name
    }

    #[must_use]
    /// Heading level, if any.
    pub fn level(self) -> Option<u8> {
        self.data().level
    }

    #[must_use]
    /// Table cell coordinates, if any.
    pub fn cell(self) -> Option<CellCoords> {
        self.data().cell
    }

    #[must_use]
    /// Containing node.
    pub fn parent(self) -> Option<Node<'t>> {
        self.wrap(self.tree.links(self.id).parent)
    }

    #[must_use]
    /// First child.
    pub fn first_child(self) -> Option<Node<'t>> {
        self.wrap(self.tree.links(self.id).first_child)
    }

    #[must_use]
    /// Last child.
    pub fn last_child(self) -> Option<Node<'t>> {
        self.wrap(self.tree.links(self.id).last_child)
    }

    #[must_use]
    /// Following sibling.
    pub fn next_sibling(self) -> Option<Node<'t>> {
        self.wrap(self.tree.links(self.id).next_sibling)
    }

    #[must_use]
    /// Preceding sibling.
    pub fn previous_sibling(self) -> Option<Node<'t>> {
        self.wrap(self.tree.links(self.id).prev_sibling)
    }

    /// Children in document order.
    pub fn children(self) -> impl Iterator<Item = Node<'t>> {
        std::iter::successors(self.first_child(), |n| n.next_sibling())
    }

    /// Children in reverse document order.
    pub fn children_rev(self) -> impl Iterator<Item = Node<'t>> {
        std::iter::successors(self.last_child(), |n| n.previous_sibling())
    }

    /// Ancestors from the parent up to the top node.
    pub fn ancestors(self) -> impl Iterator<Item = Node<'t>> {
        std::iter::successors(self.parent(), |n| n.parent())
    }

    #[must_use]
    /// Whether `self` contains `other` at any depth.
    pub fn is_ancestor_of(self, other: Node<'t>) -> bool {
        other.ancestors().any(|a| a == self)
    }

    #[must_use]
    /// Owning tree root: the nearest document or desktop at or above this node, falling back to
    /// the topmost ancestor.
    pub fn root(self) -> Node<'t> {
        let mut top = self;
        for node in std::iter::once(self).chain(self.ancestors()) {
            if matches!(node.role(), Role::RootWebArea | Role::Desktop) {
                return node;
            }
            top = node;
        }
        top
    }

    #[must_use]
    /// Whether the node is still reachable from the tree's top node.
    pub fn is_attached(self) -> bool {
        self.tree.is_attached(self.id)
    }

    #[must_use]
    /// Child indices leading from the top node down to this node.
    pub fn path(self) -> Vec<usize> {
        let mut path = Vec::new();
        let mut cur = self;
        while let Some(parent) = cur.parent() {
            path.push(parent.children().position(|c| c == cur).unwrap_or(0));
            cur = parent;
        }
        path.reverse();
        path
    }
}

#[cfg(test)]
#[path = "tests/tree.rs"]
mod tests;
