//! Positions in the node graph and unit-based movement between them.
//!
//! A [`Cursor`] is a node plus a character offset into that node's text; a [`Range`] is an
//! ordered pair of cursors. Both are plain values holding [`NodeId`]s rather than borrows, so a
//! session can keep its current range across host-side mutations of the tree and detect when
//! the nodes it points at have gone away.

use crate::navigator::{find_next, normalize, Direction, FindOptions};
use crate::predicates;
use crate::role::Role;
use crate::tree::{Node, NodeId, Tree};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Granularity of a movement.
pub enum Unit {
    /// One character of a leaf's text.
    Character,
    /// One whitespace-delimited word of a leaf's text.
    Word,
    /// One visual line: a run of consecutive inline leaves sharing a block.
    Line,
    /// One object, as found by object navigation.
    Node,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// A node and a character offset into its text.
pub struct Cursor {
    /// Node the cursor sits on.
    pub node: NodeId,
    /// Character offset, meaningful for character and word positions.
    pub offset: usize,
}

impl Cursor {
    #[must_use]
    /// Cursor at `offset` inside `node`.
    pub fn new(node: NodeId, offset: usize) -> Self {
        Self { node, offset }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Ordered pair of cursors; equal cursors describe a single position.
pub struct Range {
    /// Where the range begins.
    pub start: Cursor,
    /// Where the range ends.
    pub end: Cursor,
}

/// Character spans `[start, end)` of the whitespace-delimited words in `text`.
fn words(text: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut start = None;
    let mut len = 0;
    for (i, c) in text.chars().enumerate() {
        match (c.is_whitespace(), start) {
            (false, None) => start = Some(i),
            (true, Some(s)) => {
                spans.push((s, i));
                start = None;
            }
            _ => {}
        }
        len = i + 1;
    }
    if let Some(s) = start {
        spans.push((s, len));
    }
    spans
}

fn char_len(node: Node<'_>) -> usize {
    node.name().chars().count()
}

/// Adjacent leaf of `node` in `dir`, within its search root.
fn adjacent_leaf<'t>(node: Node<'t>, dir: Direction) -> Option<Node<'t>> {
    find_next(node, dir, predicates::is_leaf, FindOptions::skipping_ancestry().atomic())
}

/// Block a leaf's line belongs to: the nearest node at or above it that does not flow inline.
fn line_container(node: Node<'_>) -> Node<'_> {
    std::iter::once(node)
        .chain(node.ancestors())
        .find(|n| !n.role().is_inline())
        .unwrap_or(node)
}

/// Whether a line ends between `before` and the leaf `after` that follows it.
fn breaks_between(before: Node<'_>, after: Node<'_>) -> bool {
    before.role() == Role::LineBreak || line_container(before) != line_container(after)
}

/// First leaf of the line `leaf` is on.
fn line_start(leaf: Node<'_>) -> Node<'_> {
    let mut cur = leaf;
    while let Some(prev) = adjacent_leaf(cur, Direction::Backward) {
        if breaks_between(prev, cur) {
            break;
        }
        cur = prev;
    }
    cur
}

/// Last leaf of the line `leaf` is on.
fn line_end(leaf: Node<'_>) -> Node<'_> {
    let mut cur = leaf;
    while let Some(next) = adjacent_leaf(cur, Direction::Forward) {
        if breaks_between(cur, next) {
            break;
        }
        cur = next;
    }
    cur
}

impl Range {
    #[must_use]
    /// Range spanning two cursors.
    pub fn new(start: Cursor, end: Cursor) -> Self {
        Self { start, end }
    }

    #[must_use]
    /// Single position at the start of `node`.
    pub fn from_node(node: Node<'_>) -> Self {
        let cursor = Cursor::new(node.id(), 0);
        Self::new(cursor, cursor)
    }

    #[must_use]
    /// One character of `node`'s text.
    fn character(node: Node<'_>, offset: usize) -> Self {
        Self::new(
            Cursor::new(node.id(), offset),
            Cursor::new(node.id(), offset + 1),
        )
    }

    #[must_use]
    /// One word span of `node`'s text.
    fn word(node: Node<'_>, (start, end): (usize, usize)) -> Self {
        Self::new(Cursor::new(node.id(), start), Cursor::new(node.id(), end))
    }

    #[must_use]
    /// The whole line running from leaf `first` to leaf `last`.
    fn line(first: Node<'_>, last: Node<'_>) -> Self {
        Self::new(
            Cursor::new(first.id(), 0),
            Cursor::new(last.id(), char_len(last)),
        )
    }

    #[must_use]
    /// Whether start and end coincide.
    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    #[must_use]
    /// The cursor a movement in `dir` proceeds from.
    pub fn bound(&self, dir: Direction) -> Cursor {
        match dir {
            Direction::Forward => self.end,
            Direction::Backward => self.start,
        }
    }

    #[must_use]
    /// Whether both cursors still reference nodes attached to the tree.
    pub fn is_valid(&self, tree: &Tree) -> bool {
        tree.is_attached(self.start.node) && tree.is_attached(self.end.node)
    }

    #[must_use]
    /// Move by one `unit` in `dir`.
    ///
    /// Never produces an invalid range: when no further position exists, or when this range is
    /// itself no longer valid, the range is returned unchanged.
    pub fn move_by(&self, tree: &Tree, unit: Unit, dir: Direction) -> Self {
        if !self.is_valid(tree) {
            return *self;
        }
        let Some(start) = tree.node(self.start.node) else {
            return *self;
        };
        let moved = match unit {
            Unit::Character => self.move_character(start, dir),
            Unit::Word => self.move_word(start, dir),
            Unit::Line => self.move_line(tree, dir),
            Unit::Node => find_next(
                start,
                dir,
                predicates::is_object,
                FindOptions::skipping_ancestry().atomic(),
            )
            .map(|n| Self::from_node(normalize(n, dir))),
        };
        moved.unwrap_or(*self)
    }

    fn move_character(&self, node: Node<'_>, dir: Direction) -> Option<Self> {
        let offset = self.start.offset;
        let within = match dir {
            Direction::Forward => (offset + 1 < char_len(node)).then_some(offset + 1),
            Direction::Backward => offset.checked_sub(1).filter(|o| *o < char_len(node)),
        };
        if let Some(offset) = within {
            return Some(Self::character(node, offset));
        }
        let mut cur = node;
        loop {
            cur = adjacent_leaf(cur, dir)?;
            let len = char_len(cur);
            if len > 0 {
                let offset = match dir {
                    Direction::Forward => 0,
                    Direction::Backward => len - 1,
                };
                return Some(Self::character(cur, offset));
            }
        }
    }

    fn move_word(&self, node: Node<'_>, dir: Direction) -> Option<Self> {
        let offset = self.start.offset;
        let spans = words(node.name());
        let within = match dir {
            Direction::Forward => spans.iter().find(|(s, _)| *s > offset),
            Direction::Backward => spans.iter().rev().find(|(s, _)| *s < offset),
        };
        if let Some(span) = within {
            return Some(Self::word(node, *span));
        }
        let mut cur = node;
        loop {
            cur = adjacent_leaf(cur, dir)?;
            let spans = words(cur.name());
            let span = match dir {
                Direction::Forward => spans.first(),
                Direction::Backward => spans.last(),
            };
            if let Some(span) = span {
                return Some(Self::word(cur, *span));
            }
        }
    }

    fn move_line(&self, tree: &Tree, dir: Direction) -> Option<Self> {
        let anchor = tree.node(self.bound(dir).node)?;
        let leafy = predicates::is_leaf(anchor);
        match dir {
            Direction::Forward => {
                let end = if leafy { line_end(anchor) } else { anchor };
                let first = adjacent_leaf(end, Direction::Forward)?;
                Some(Self::line(first, line_end(first)))
            }
            Direction::Backward => {
                let start = if leafy { line_start(anchor) } else { anchor };
                let last = adjacent_leaf(start, Direction::Backward)?;
                Some(Self::line(line_start(last), last))
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/cursor.rs"]
mod tests;
