//! The closed set of navigation commands and what each one resolves to.
//!
//! Hosts deliver commands as camelCase strings (`nextHeading2`, `goToRowFirstCell`, ...) or build
//! [`Command`] values directly. [`Command::resolve`] maps every variant to a [`Resolution`]: either
//! a [`MovementSpec`] driven by a unit or a predicate, a table cell resolved up front, or one of
//! the special-case handlers. The mapping is an exhaustive `match`, so a new command cannot be
//! added without saying what it does.

use crate::cursor::Unit;
use crate::error::NavError;
use crate::navigator::Direction;
use crate::predicates::{self, Axis, Predicate, TableOpts};
use crate::tree::{Node, NodeId};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// Heading level a heading search is restricted to.
pub enum HeadingLevel {
    /// `<h1>`.
    H1,
    /// `<h2>`.
    H2,
    /// `<h3>`.
    H3,
    /// `<h4>`.
    H4,
    /// `<h5>`.
    H5,
    /// `<h6>`.
    H6,
}

impl HeadingLevel {
    /// All levels, outermost first.
    pub const ALL: [Self; 6] = [Self::H1, Self::H2, Self::H3, Self::H4, Self::H5, Self::H6];

    #[must_use]
    /// Numeric level, 1 to 6.
    pub fn number(self) -> u8 {
        match self {
            Self::H1 => 1,
            Self::H2 => 2,
            Self::H3 => 3,
            Self::H4 => 4,
            Self::H5 => 5,
            Self::H6 => 6,
        }
    }

    #[must_use]
    /// Level for a number in `1..=6`.
    pub fn from_number(n: u8) -> Option<Self> {
        Self::ALL.get(usize::from(n).checked_sub(1)?).copied()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// Kind of content a predicate search looks for.
pub enum Target {
    /// Push and menu buttons.
    Button,
    /// Check boxes and switches.
    Checkbox,
    /// Combo boxes.
    ComboBox,
    /// Editable text.
    EditText,
    /// Any form control.
    FormField,
    /// Headings, optionally of one level only.
    Heading(Option<HeadingLevel>),
    /// Links.
    Link,
    /// Tables.
    Table,
    /// Visited links.
    VisitedLink,
}

impl Target {
    fn predicate(self) -> Predicate {
        match self {
            Self::Button => Box::new(predicates::button),
            Self::Checkbox => Box::new(predicates::check_box),
            Self::ComboBox => Box::new(predicates::combo_box),
            Self::EditText => Box::new(predicates::edit_text),
            Self::FormField => Box::new(predicates::form_field),
            Self::Heading(None) => Box::new(predicates::heading),
            Self::Heading(Some(level)) => Box::new(predicates::heading_at_level(level.number())),
            Self::Link => Box::new(predicates::link),
            Self::Table => Box::new(predicates::table),
            Self::VisitedLink => Box::new(predicates::visited_link),
        }
    }

    /// Message key announced when a search for this target finds nothing.
    fn error_key(self, dir: Direction) -> &'static str {
        use Direction::{Backward, Forward};
        use HeadingLevel::{H1, H2, H3, H4, H5, H6};
        match (self, dir) {
            (Self::Button, Forward) => "no_next_button",
            (Self::Button, Backward) => "no_previous_button",
            (Self::Checkbox, Forward) => "no_next_checkbox",
            (Self::Checkbox, Backward) => "no_previous_checkbox",
            (Self::ComboBox, Forward) => "no_next_combo_box",
            (Self::ComboBox, Backward) => "no_previous_combo_box",
            (Self::EditText, Forward) => "no_next_edit_text",
            (Self::EditText, Backward) => "no_previous_edit_text",
            (Self::FormField, Forward) => "no_next_form_field",
            (Self::FormField, Backward) => "no_previous_form_field",
            (Self::Heading(None), Forward) => "no_next_heading",
            (Self::Heading(None), Backward) => "no_previous_heading",
            (Self::Heading(Some(H1)), Forward) => "no_next_heading_1",
            (Self::Heading(Some(H1)), Backward) => "no_previous_heading_1",
            (Self::Heading(Some(H2)), Forward) => "no_next_heading_2",
            (Self::Heading(Some(H2)), Backward) => "no_previous_heading_2",
            (Self::Heading(Some(H3)), Forward) => "no_next_heading_3",
            (Self::Heading(Some(H3)), Backward) => "no_previous_heading_3",
            (Self::Heading(Some(H4)), Forward) => "no_next_heading_4",
            (Self::Heading(Some(H4)), Backward) => "no_previous_heading_4",
            (Self::Heading(Some(H5)), Forward) => "no_next_heading_5",
            (Self::Heading(Some(H5)), Backward) => "no_previous_heading_5",
            (Self::Heading(Some(H6)), Forward) => "no_next_heading_6",
            (Self::Heading(Some(H6)), Backward) => "no_previous_heading_6",
            (Self::Link, Forward) => "no_next_link",
            (Self::Link, Backward) => "no_previous_link",
            (Self::Table, Forward) => "no_next_table",
            (Self::Table, Backward) => "no_previous_table",
            (Self::VisitedLink, Forward) => "no_next_visited_link",
            (Self::VisitedLink, Backward) => "no_previous_visited_link",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// Movement relative to the table cell holding the current position.
pub enum TableMove {
    /// Cell below.
    NextRow,
    /// Cell above.
    PreviousRow,
    /// Cell to the right.
    NextCol,
    /// Cell to the left.
    PreviousCol,
    /// Leftmost cell of the row.
    RowFirstCell,
    /// Rightmost cell of the row.
    RowLastCell,
    /// Top cell of the column.
    ColFirstCell,
    /// Bottom cell of the column.
    ColLastCell,
    /// First cell of the table.
    FirstCell,
    /// Last cell of the table.
    LastCell,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// A navigation intent.
pub enum Command {
    /// Move by a unit.
    Move(Unit, Direction),
    /// Search for the next or previous node of a kind.
    Find(Target, Direction),
    /// Move within a table.
    Table(TableMove),
    /// First leaf of the current document.
    JumpToTop,
    /// Last leaf of the current document.
    JumpToBottom,
    /// Start continuous forward reading.
    ReadFromHere,
    /// Stop continuous reading.
    StopSpeech,
    /// Perform the default action of the current node.
    ForceClickOnCurrentItem,
    /// Open the context menu of the current node.
    ContextMenu,
    /// Speak the title of the current document or window.
    ReadCurrentTitle,
    /// Speak the address of the current document.
    ReadCurrentUrl,
}

/// Canonical command names; the first entry for a command is its display name.
const NAMES: &[(&str, Command)] = {
    use Command::{Find, Move, Table};
    use Direction::{Backward, Forward};
    use HeadingLevel::{H1, H2, H3, H4, H5, H6};
    &[
        ("nextCharacter", Move(Unit::Character, Forward)),
        ("previousCharacter", Move(Unit::Character, Backward)),
        ("nextWord", Move(Unit::Word, Forward)),
        ("previousWord", Move(Unit::Word, Backward)),
        ("nextLine", Move(Unit::Line, Forward)),
        ("forward", Move(Unit::Line, Forward)),
        ("previousLine", Move(Unit::Line, Backward)),
        ("backward", Move(Unit::Line, Backward)),
        ("nextObject", Move(Unit::Node, Forward)),
        ("right", Move(Unit::Node, Forward)),
        ("previousObject", Move(Unit::Node, Backward)),
        ("left", Move(Unit::Node, Backward)),
        ("nextButton", Find(Target::Button, Forward)),
        ("previousButton", Find(Target::Button, Backward)),
        ("nextCheckbox", Find(Target::Checkbox, Forward)),
        ("previousCheckbox", Find(Target::Checkbox, Backward)),
        ("nextComboBox", Find(Target::ComboBox, Forward)),
        ("previousComboBox", Find(Target::ComboBox, Backward)),
        ("nextEditText", Find(Target::EditText, Forward)),
        ("previousEditText", Find(Target::EditText, Backward)),
        ("nextFormField", Find(Target::FormField, Forward)),
        ("previousFormField", Find(Target::FormField, Backward)),
        ("nextHeading", Find(Target::Heading(None), Forward)),
        ("previousHeading", Find(Target::Heading(None), Backward)),
        ("nextHeading1", Find(Target::Heading(Some(H1)), Forward)),
        ("previousHeading1", Find(Target::Heading(Some(H1)), Backward)),
        ("nextHeading2", Find(Target::Heading(Some(H2)), Forward)),
        ("previousHeading2", Find(Target::Heading(Some(H2)), Backward)),
        ("nextHeading3", Find(Target::Heading(Some(H3)), Forward)),
        ("previousHeading3", Find(Target::Heading(Some(H3)), Backward)),
        ("nextHeading4", Find(Target::Heading(Some(H4)), Forward)),
        ("previousHeading4", Find(Target::Heading(Some(H4)), Backward)),
        ("nextHeading5", Find(Target::Heading(Some(H5)), Forward)),
        ("previousHeading5", Find(Target::Heading(Some(H5)), Backward)),
        ("nextHeading6", Find(Target::Heading(Some(H6)), Forward)),
        ("previousHeading6", Find(Target::Heading(Some(H6)), Backward)),
        ("nextLink", Find(Target::Link, Forward)),
        ("previousLink", Find(Target::Link, Backward)),
        ("nextTable", Find(Target::Table, Forward)),
        ("previousTable", Find(Target::Table, Backward)),
        ("nextVisitedLink", Find(Target::VisitedLink, Forward)),
        ("previousVisitedLink", Find(Target::VisitedLink, Backward)),
        ("nextRow", Table(TableMove::NextRow)),
        ("previousRow", Table(TableMove::PreviousRow)),
        ("nextCol", Table(TableMove::NextCol)),
        ("previousCol", Table(TableMove::PreviousCol)),
        ("goToRowFirstCell", Table(TableMove::RowFirstCell)),
        ("goToRowLastCell", Table(TableMove::RowLastCell)),
        ("goToColFirstCell", Table(TableMove::ColFirstCell)),
        ("goToColLastCell", Table(TableMove::ColLastCell)),
        ("goToFirstCell", Table(TableMove::FirstCell)),
        ("goToLastCell", Table(TableMove::LastCell)),
        ("jumpToTop", Command::JumpToTop),
        ("jumpToBottom", Command::JumpToBottom),
        ("readFromHere", Command::ReadFromHere),
        ("stopSpeech", Command::StopSpeech),
        ("forceClickOnCurrentItem", Command::ForceClickOnCurrentItem),
        ("contextMenu", Command::ContextMenu),
        ("readCurrentTitle", Command::ReadCurrentTitle),
        ("readCurrentURL", Command::ReadCurrentUrl),
    ]
};

impl Command {
    /// Every command with its canonical name, aliases excluded.
    pub fn all() -> impl Iterator<Item = (&'static str, Command)> {
        NAMES
            .iter()
            .enumerate()
            .filter(|(i, (_, cmd))| NAMES[..*i].iter().all(|(_, c)| c != cmd))
            .map(|(_, entry)| *entry)
    }

    #[must_use]
    /// Canonical camelCase name.
    pub fn name(self) -> &'static str {
        NAMES
            .iter()
            .find(|(_, cmd)| *cmd == self)
            .map_or("unknown", |(name, _)| name)
    }

    /// Resolve against the node the current range starts at.
    ///
    /// # Errors
    ///
    /// Table movements report [`NavError::StructuralGap`] when no cell lies in the requested
    /// direction, or when `current` is not inside a table.
    pub fn resolve(self, current: Node<'_>) -> Result<Resolution, NavError> {
        Ok(match self {
            Self::Move(unit, direction) => Resolution::Movement(MovementSpec {
                direction,
                driver: Driver::Unit(unit),
            }),
            Self::Find(target, direction) => Resolution::Movement(MovementSpec {
                direction,
                driver: Driver::Predicate {
                    predicate: target.predicate(),
                    error_key: target.error_key(direction),
                    root: predicates::is_root,
                },
            }),
            // The target may sit in another row node, or before `current` in document order.
            Self::Table(movement) => match movement.plan() {
                TablePlan::Step(opts, key) => Resolution::Cell(
                    predicates::table_cell_target(current, opts)
                        .ok_or(NavError::StructuralGap { key })?,
                ),
                TablePlan::Edge(direction) => Resolution::TableEdge(direction),
            },
            Self::JumpToTop => Resolution::Jump(Direction::Forward),
            Self::JumpToBottom => Resolution::Jump(Direction::Backward),
            Self::ReadFromHere => Resolution::ReadFromHere,
            Self::StopSpeech => Resolution::StopSpeech,
            Self::ForceClickOnCurrentItem => Resolution::Activate,
            Self::ContextMenu => Resolution::ContextMenu,
            Self::ReadCurrentTitle => Resolution::ReadTitle,
            Self::ReadCurrentUrl => Resolution::ReadUrl,
        })
    }
}

/// How a [`TableMove`] is carried out.
enum TablePlan {
    /// Step to the cell [`predicates::table_cell_target`] picks, or announce the key.
    Step(TableOpts, &'static str),
    /// First (forward) or last (backward) cell of the table in document order.
    Edge(Direction),
}

impl TableMove {
    fn plan(self) -> TablePlan {
        use Direction::{Backward, Forward};
        let step = |axis, direction, to_edge, key| {
            TablePlan::Step(
                TableOpts {
                    axis,
                    direction,
                    to_edge,
                },
                key,
            )
        };
        match self {
            Self::NextRow => step(Axis::Row, Forward, false, "no_cell_below"),
            Self::PreviousRow => step(Axis::Row, Backward, false, "no_cell_above"),
            Self::NextCol => step(Axis::Col, Forward, false, "no_cell_right"),
            Self::PreviousCol => step(Axis::Col, Backward, false, "no_cell_left"),
            Self::RowFirstCell => step(Axis::Col, Backward, true, "no_cell_left"),
            Self::RowLastCell => step(Axis::Col, Forward, true, "no_cell_right"),
            Self::ColFirstCell => step(Axis::Row, Backward, true, "no_cell_above"),
            Self::ColLastCell => step(Axis::Row, Forward, true, "no_cell_below"),
            Self::FirstCell => TablePlan::Edge(Forward),
            Self::LastCell => TablePlan::Edge(Backward),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Command {
    type Err = NavError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NAMES
            .iter()
            .find(|(name, _)| *name == s)
            .map(|(_, cmd)| *cmd)
            .ok_or_else(|| NavError::Unhandled {
                command: s.to_string(),
            })
    }
}

/// What drives a movement: a unit step or a predicate search.
pub enum Driver {
    /// Step the current range by a unit.
    Unit(Unit),
    /// Search for the next node matching `predicate`.
    Predicate {
        /// Test a match must pass.
        predicate: Predicate,
        /// Message key announced when nothing matches.
        error_key: &'static str,
        /// Bounds the search to the nearest node at or above the start matching it.
        root: fn(Node<'_>) -> bool,
    },
}

impl fmt::Debug for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unit(unit) => f.debug_tuple("Unit").field(unit).finish(),
            Self::Predicate { error_key, .. } => f
                .debug_struct("Predicate")
                .field("error_key", error_key)
                .finish_non_exhaustive(),
        }
    }
}

#[derive(Debug)]
/// A direction plus exactly one driver.
pub struct MovementSpec {
    /// Which way to move.
    pub direction: Direction,
    /// Unit or predicate.
    pub driver: Driver,
}

#[derive(Debug)]
/// Result of resolving a [`Command`].
pub enum Resolution {
    /// Move the current range.
    Movement(MovementSpec),
    /// Go to the first (forward) or last (backward) leaf of the current document.
    Jump(Direction),
    /// Go to a table cell resolved from the current position.
    Cell(NodeId),
    /// Go to the first (forward) or last (backward) cell of the enclosing table.
    TableEdge(Direction),
    /// Start continuous reading.
    ReadFromHere,
    /// Stop continuous reading.
    StopSpeech,
    /// Perform the current node's default action.
    Activate,
    /// Show the current node's context menu.
    ContextMenu,
    /// Speak the name of the current document, or of the enclosing window outside documents.
    ReadTitle,
    /// Speak the current document's address.
    ReadUrl,
}

#[cfg(test)]
#[path = "tests/command.rs"]
mod tests;
