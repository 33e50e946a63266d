//! Pure tests over nodes, plus factories for parameterised ones.
//!
//! Every predicate here is side-effect free and may be evaluated any number of times, against any
//! node of the tree, including nodes outside the subtree a search started in.

use crate::navigator::{nearest_ancestor, Direction};
use crate::role::Role;
use crate::tree::{CellCoords, Node, NodeId};

/// Boxed predicate, for choosing a test at runtime.
pub type Predicate = Box<dyn Fn(Node<'_>) -> bool>;

#[must_use]
/// A position-bearing node: childless, a control that presents as a single unit, or a node whose
/// children are all layout text boxes.
pub fn is_leaf(node: Node<'_>) -> bool {
    if node.first_child().is_none() {
        return true;
    }
    matches!(
        node.role(),
        Role::Button
            | Role::PopUpButton
            | Role::Slider
            | Role::TextField
            | Role::SearchBox
            | Role::ComboBox
            | Role::SpinButton
            | Role::Switch
    ) || node.children().all(|c| c.role() == Role::InlineTextBox)
}

#[must_use]
/// Boundary a search may not leave: the desktop, windows, dialogs and documents.
pub fn is_root(node: Node<'_>) -> bool {
    matches!(
        node.role(),
        Role::Desktop | Role::Window | Role::Dialog | Role::RootWebArea
    )
}

#[must_use]
/// Structural grouping that is never itself a position.
pub fn is_container(node: Node<'_>) -> bool {
    matches!(
        node.role(),
        Role::Desktop
            | Role::Window
            | Role::Dialog
            | Role::RootWebArea
            | Role::Table
            | Role::Row
            | Role::List
            | Role::ListItem
            | Role::Group
            | Role::GenericContainer
            | Role::Toolbar
            | Role::Blockquote
            | Role::Paragraph
    )
}

#[must_use]
/// Unit of object navigation.
pub fn is_object(node: Node<'_>) -> bool {
    is_leaf(node)
}

#[must_use]
/// Push buttons and menu buttons.
pub fn button(node: Node<'_>) -> bool {
    matches!(node.role(), Role::Button | Role::PopUpButton)
}

#[must_use]
/// Check boxes and switches.
pub fn check_box(node: Node<'_>) -> bool {
    matches!(node.role(), Role::CheckBox | Role::Switch)
}

#[must_use]
/// Combo boxes.
pub fn combo_box(node: Node<'_>) -> bool {
    node.role() == Role::ComboBox
}

#[must_use]
/// Editable text inputs.
pub fn edit_text(node: Node<'_>) -> bool {
    matches!(node.role(), Role::TextField | Role::SearchBox)
}

#[must_use]
/// Any interactive form control.
pub fn form_field(node: Node<'_>) -> bool {
    node.role().is_form_control()
}

#[must_use]
/// Headings of any level.
pub fn heading(node: Node<'_>) -> bool {
    node.role() == Role::Heading
}

#[must_use]
/// Hyperlinks.
pub fn link(node: Node<'_>) -> bool {
    node.role() == Role::Link
}

#[must_use]
/// Hyperlinks whose target has been visited.
pub fn visited_link(node: Node<'_>) -> bool {
    link(node) && node.data().visited
}

#[must_use]
/// Tables.
pub fn table(node: Node<'_>) -> bool {
    node.role() == Role::Table
}

#[must_use]
/// Table rows.
pub fn row(node: Node<'_>) -> bool {
    node.role() == Role::Row
}

#[must_use]
/// Cells of any kind that carry grid coordinates.
pub fn cell_like(node: Node<'_>) -> bool {
    node.role().is_cell_like() && node.cell().is_some()
}

/// Headings at exactly `level`.
pub fn heading_at_level(level: u8) -> impl Fn(Node<'_>) -> bool {
    move |node: Node<'_>| heading(node) && node.level() == Some(level)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Grid index a table movement changes.
pub enum Axis {
    /// Move between rows, keeping the column.
    Row,
    /// Move between columns, keeping the row.
    Col,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Parameters of [`table_cell_adjacent`].
pub struct TableOpts {
    /// Which index changes.
    pub axis: Axis,
    /// Towards higher (forward) or lower (backward) indices.
    pub direction: Direction,
    /// Jump to the outermost cell along the axis instead of the adjacent one.
    pub to_edge: bool,
}

/// Span of a cell along the moving axis and across it.
fn extents(coords: CellCoords, axis: Axis) -> ((usize, usize), (usize, usize)) {
    let rows = (coords.row, coords.last_row());
    let cols = (coords.col, coords.last_col());
    match axis {
        Axis::Row => (rows, cols),
        Axis::Col => (cols, rows),
    }
}

/// Gap between two spans; zero when they overlap.
fn gap(a: (usize, usize), b: (usize, usize)) -> usize {
    if a.1 < b.0 {
        b.0 - a.1
    } else if b.1 < a.0 {
        a.0 - b.1
    } else {
        0
    }
}

/// Cells of `table`, skipping the contents of nested tables.
fn cells_of(table: Node<'_>) -> Vec<(Node<'_>, CellCoords)> {
    let mut cells = Vec::new();
    let mut stack: Vec<Node<'_>> = table.children_rev().collect();
    while let Some(node) = stack.pop() {
        if let (true, Some(coords)) = (node.role().is_cell_like(), node.cell()) {
            cells.push((node, coords));
        }
        if node.role() != Role::Table {
            stack.extend(node.children_rev());
        }
    }
    cells
}

/// Resolve the cell a table movement from `reference` lands on.
///
/// Candidates lie strictly beyond the reference cell's span along the moving axis. Among them,
/// cells whose span across the axis overlaps the reference cell's win first, so a move stays in
/// its row or column whenever any cell there qualifies; after that, the smallest cross-axis gap
/// wins. Remaining ties go to the nearest cell along the axis for an adjacent move and the
/// farthest for an edge move, then to the lower cross-axis index. Missing and merged cells are
/// therefore skipped over rather than ending the move.
///
/// An edge move with nothing beyond the reference cell resolves to the reference cell itself.
#[must_use]
pub fn table_cell_target(reference: Node<'_>, opts: TableOpts) -> Option<NodeId> {
    let cell = nearest_ancestor(reference, cell_like)?;
    let grid = nearest_ancestor(cell, table)?;
    let coords = cell.cell()?;
    let (along, across) = extents(coords, opts.axis);

    let distance = |a: (usize, usize)| match opts.direction {
        Direction::Forward => a.0.checked_sub(along.1).filter(|d| *d > 0),
        Direction::Backward => along.0.checked_sub(a.1).filter(|d| *d > 0),
    };
    let best = cells_of(grid)
        .into_iter()
        .filter(|(node, _)| *node != cell)
        .filter_map(|(node, c)| {
            let (a, x) = extents(c, opts.axis);
            let d = distance(a)?;
            let rank = if opts.to_edge { usize::MAX - d } else { d };
            Some(((gap(x, across), rank, x.0), node.id()))
        })
        .min_by_key(|(key, _)| *key)
        .map(|(_, id)| id);

    match best {
        None if opts.to_edge => Some(cell.id()),
        found => found,
    }
}

/// Matches the cell a table movement from `reference` lands on, per [`table_cell_target`].
///
/// When `reference` is not inside a table cell, or no cell lies in the requested direction, the
/// predicate matches nothing.
pub fn table_cell_adjacent(reference: Node<'_>, opts: TableOpts) -> impl Fn(Node<'_>) -> bool {
    let target = table_cell_target(reference, opts);
    move |node: Node<'_>| Some(node.id()) == target
}

#[cfg(test)]
#[path = "tests/predicates.rs"]
mod tests;
