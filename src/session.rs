//! Per-user navigation state and the command resolver that is its only writer.
//!
//! A [`Session`] owns the current [`Range`], the last focus the host reported and the continuous
//! reading flag. Every command passes through [`Session::execute`], which first repairs a stale
//! position against the cached focus, then resolves the command and applies the result. Output
//! goes to the host through the [`Host`] trait; the session never renders anything itself.

mod continuity;

pub use continuity::ReadStep;

use crate::command::{Command, Driver, MovementSpec, Resolution};
use crate::cursor::Range;
use crate::error::NavError;
use crate::navigator::{find_first, find_next, nearest_ancestor, normalize, Direction, FindOptions};
use crate::predicates;
use crate::role::Role;
use crate::tree::{Node, NodeId, Tree};
use tracing::{debug, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Why a range is being presented.
pub enum OutputEvent {
    /// The user moved.
    Navigate,
    /// Continuous reading advanced.
    Read,
}

/// Everything the session needs from its embedding application.
pub trait Host {
    /// Render or announce `range`; `previous` is the range it replaces, for diffing.
    fn present(&mut self, tree: &Tree, range: &Range, previous: Option<&Range>, event: OutputEvent);

    /// Announce a localized message by key.
    fn announce(&mut self, key: &'static str);

    /// Speak plain text that is not tied to a range, such as a document title.
    fn speak(&mut self, text: &str);

    /// Perform the default action of `node`.
    fn activate(&mut self, tree: &Tree, node: NodeId);

    /// Open the context menu of `node`.
    fn show_context_menu(&mut self, tree: &Tree, node: NodeId);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// What a dispatched command did.
pub enum Outcome {
    /// The position changed.
    Moved(Range),
    /// The position stayed put, with the message key announced if there was one.
    Unchanged {
        /// Message key, when the command failed in a user-visible way.
        key: Option<&'static str>,
    },
    /// The command has no meaning here; the host should apply its own default.
    Unhandled,
}

impl From<NavError> for Outcome {
    fn from(err: NavError) -> Self {
        match err {
            NavError::NotFound { key } | NavError::StructuralGap { key } => {
                Self::Unchanged { key: Some(key) }
            }
            NavError::InvalidPosition => Self::Unchanged { key: None },
            NavError::Unhandled { .. } => Self::Unhandled,
        }
    }
}

#[derive(Debug, Default)]
/// Navigation state of one user.
pub struct Session {
    current: Option<Range>,
    focus: Option<NodeId>,
    reading: bool,
}

impl Session {
    #[must_use]
    /// Session with no position yet.
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    /// Session positioned at `range`.
    pub fn starting_at(range: Range) -> Self {
        Self {
            current: Some(range),
            ..Self::default()
        }
    }

    #[must_use]
    /// Current position.
    pub fn current(&self) -> Option<&Range> {
        self.current.as_ref()
    }

    #[must_use]
    /// Last focus the host reported.
    pub fn focus(&self) -> Option<NodeId> {
        self.focus
    }

    #[must_use]
    /// Whether continuous reading is active.
    pub fn is_reading(&self) -> bool {
        self.reading
    }

    /// Record a host focus change.
    ///
    /// A change of focus cancels continuous reading. When the session has no position yet, the
    /// new focus becomes it.
    pub fn on_focus_changed(&mut self, tree: &Tree, focus: Option<NodeId>) {
        if self.focus != focus {
            self.stop_reading();
        }
        self.focus = focus;
        if self.current.is_none() {
            self.current = self.focus_range(tree);
        }
    }

    fn focus_range(&self, tree: &Tree) -> Option<Range> {
        self.focus
            .filter(|id| tree.is_attached(*id))
            .and_then(|id| tree.node(id))
            .map(Range::from_node)
    }

    /// Replace a current range whose nodes have left the tree with the focus, or clear it.
    pub fn validate(&mut self, tree: &Tree) {
        let Some(current) = self.current else {
            return;
        };
        if current.is_valid(tree) {
            return;
        }
        let recovered = self.focus_range(tree);
        warn!(?current, ?recovered, "current position detached, recovering");
        self.current = recovered;
    }

    /// Parse and execute a host command string.
    pub fn handle(&mut self, tree: &Tree, input: &str, host: &mut impl Host) -> Outcome {
        match input.parse::<Command>() {
            Ok(command) => self.execute(tree, command, host),
            Err(err) => {
                debug!(input, "unknown command");
                Outcome::from(err)
            }
        }
    }

    /// Execute one command against the current position.
    pub fn execute(&mut self, tree: &Tree, command: Command, host: &mut impl Host) -> Outcome {
        self.validate(tree);
        let outcome = self.dispatch(tree, command, host);
        debug!(%command, ?outcome, "command executed");
        outcome
    }

    fn dispatch(&mut self, tree: &Tree, command: Command, host: &mut impl Host) -> Outcome {
        if command == Command::StopSpeech {
            self.stop_reading();
            return Outcome::Unchanged { key: None };
        }
        let Some(current) = self.current else {
            return Outcome::Unhandled;
        };
        let Some(start) = tree.node(current.start.node) else {
            return NavError::InvalidPosition.into();
        };
        let resolution = match command.resolve(start) {
            Ok(resolution) => resolution,
            Err(err) => return self.fail(err, host),
        };
        match resolution {
            Resolution::Movement(spec) => match apply(tree, current, spec) {
                Ok(range) => self.commit(tree, range, host, OutputEvent::Navigate),
                Err(err) => self.fail(err, host),
            },
            Resolution::Jump(dir) => {
                match find_first(start.root(), dir, predicates::is_leaf) {
                    Some(leaf) => self.commit(tree, Range::from_node(leaf), host, OutputEvent::Navigate),
                    None => Outcome::Unchanged { key: None },
                }
            }
            Resolution::Cell(cell) => match tree.node(cell) {
                Some(cell) => self.commit(tree, Range::from_node(cell), host, OutputEvent::Navigate),
                None => NavError::InvalidPosition.into(),
            },
            Resolution::TableEdge(dir) => {
                let cell = nearest_ancestor(start, predicates::table)
                    .and_then(|table| find_first(table, dir, predicates::cell_like));
                match cell {
                    Some(cell) => self.commit(tree, Range::from_node(cell), host, OutputEvent::Navigate),
                    None => Outcome::Unchanged { key: None },
                }
            }
            Resolution::ReadFromHere => self.read_from_here(tree, host),
            Resolution::StopSpeech => {
                self.stop_reading();
                Outcome::Unchanged { key: None }
            }
            Resolution::Activate => {
                host.activate(tree, action_target(start).id());
                Outcome::Unchanged { key: None }
            }
            Resolution::ContextMenu => {
                host.show_context_menu(tree, action_target(start).id());
                Outcome::Unchanged { key: None }
            }
            Resolution::ReadTitle => {
                if let Some(title) = title(start).filter(|t| !t.is_empty()) {
                    host.speak(title);
                }
                Outcome::Unchanged { key: None }
            }
            Resolution::ReadUrl => {
                if let Some(url) = start.root().data().url.as_deref().filter(|u| !u.is_empty()) {
                    host.speak(url);
                }
                Outcome::Unchanged { key: None }
            }
        }
    }

    fn fail(&self, err: NavError, host: &mut impl Host) -> Outcome {
        if let Some(key) = err.message_key() {
            host.announce(key);
        }
        err.into()
    }

    /// Make `range` current and present it, reporting whether anything moved.
    fn commit(&mut self, tree: &Tree, range: Range, host: &mut impl Host, event: OutputEvent) -> Outcome {
        let previous = self.current.replace(range);
        host.present(tree, &range, previous.as_ref(), event);
        if previous == Some(range) {
            Outcome::Unchanged { key: None }
        } else {
            Outcome::Moved(range)
        }
    }
}

/// Node a default action or context menu applies to: layout text boxes defer to their parent.
fn action_target(node: Node<'_>) -> Node<'_> {
    match node.role() {
        Role::InlineTextBox => node.parent().unwrap_or(node),
        _ => node,
    }
}

/// Name of the document `node` belongs to, falling back to its address; outside documents, the
/// name of the enclosing window.
fn title(node: Node<'_>) -> Option<&str> {
    let root = node.root();
    if root.role() == Role::RootWebArea {
        return Some(match root.name() {
            "" => root.data().url.as_deref().unwrap_or_default(),
            name => name,
        });
    }
    nearest_ancestor(node, |n| n.role() == Role::Window).map(Node::name)
}

/// Compute the range a movement from `current` lands on.
fn apply(tree: &Tree, current: Range, spec: MovementSpec) -> Result<Range, NavError> {
    let dir = spec.direction;
    match spec.driver {
        Driver::Unit(unit) => Ok(current.move_by(tree, unit, dir)),
        Driver::Predicate {
            predicate,
            error_key,
            root,
        } => {
            let bound = tree
                .node(current.bound(dir).node)
                .ok_or(NavError::InvalidPosition)?;
            let opts = FindOptions::skipping_ancestry().within(root);
            find_next(bound, dir, |n| predicate(n), opts)
                .map(|found| Range::from_node(normalize(found, Direction::Forward)))
                .ok_or(NavError::NotFound { key: error_key })
        }
    }
}

#[cfg(test)]
#[path = "tests/session.rs"]
mod tests;
