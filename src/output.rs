//! Plain-text rendering of positions, shared by the terminal UI and batch transcripts.

use crate::cursor::Range;
use crate::navigator::{find_next, Direction, FindOptions};
use crate::predicates;
use crate::role::Role;
use crate::tree::{Node, Tree};

/// Role and state of a node, e.g. `heading 2` or `check box, checked`.
#[must_use]
pub fn describe_node(node: Node<'_>) -> String {
    let data = node.data();
    let mut text = match (node.role(), data.level) {
        (Role::Heading, Some(level)) => format!("heading {level}"),
        (role, _) => role.label().to_string(),
    };
    if data.role == Role::Link && data.visited {
        text.insert_str(0, "visited ");
    }
    if let Some(checked) = data.checked {
        text.push_str(if checked { ", checked" } else { ", not checked" });
    }
    if let Some(cell) = data.cell {
        text.push_str(&format!(", row {} column {}", cell.row + 1, cell.col + 1));
    }
    text
}

/// What a screen reader would say for `range`.
///
/// A span inside one node reads that part of its text; a span across nodes reads every leaf on
/// the way; a single position reads the node's name followed by its description.
#[must_use]
pub fn describe(tree: &Tree, range: &Range) -> String {
    let Some(start) = tree.node(range.start.node) else {
        return String::new();
    };
    if range.start.node == range.end.node {
        if range.end.offset > range.start.offset {
            return start
                .name()
                .chars()
                .skip(range.start.offset)
                .take(range.end.offset - range.start.offset)
                .collect();
        }
        return if start.name().is_empty() {
            describe_node(start)
        } else {
            format!("{}, {}", start.name(), describe_node(start))
        };
    }

    let mut words = vec![start.name()];
    let mut cur = start;
    while cur.id() != range.end.node {
        let Some(next) = find_next(
            cur,
            Direction::Forward,
            predicates::is_leaf,
            FindOptions::skipping_ancestry().atomic(),
        ) else {
            break;
        };
        words.push(next.name());
        cur = next;
    }
    words.retain(|w| !w.is_empty());
    words.join(" ")
}

#[cfg(test)]
#[path = "tests/output.rs"]
mod tests;
