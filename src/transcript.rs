//! Batch mode: run a list of command strings and record what happened.
//!
//! A transcript is the serialisable record of a batch run, one step per command, with the
//! position after the command and everything the session asked the host to say. It is what the
//! binary prints for `--commands` and what scripted checks compare against.

use crate::cursor::Range;
use crate::messages::Messages;
use crate::navigator::{find_first, Direction};
use crate::output;
use crate::predicates;
use crate::role::Role;
use crate::session::{Host, Outcome, OutputEvent, ReadStep, Session};
use crate::tree::{NodeId, Tree};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
/// A position, located by its path from the top of the graph.
pub struct Position {
    /// Child indices from the desktop down to the start node.
    pub path: Vec<usize>,
    /// Role of the start node.
    pub role: Role,
    /// Name of the start node.
    pub name: String,
    /// Character offset of the start cursor.
    pub start_offset: usize,
    /// Character offset of the end cursor.
    pub end_offset: usize,
}

impl Position {
    #[must_use]
    /// Locate `range` in `tree`.
    pub fn of(tree: &Tree, range: &Range) -> Option<Self> {
        let node = tree.node(range.start.node)?;
        Some(Self {
            path: node.path(),
            role: node.role(),
            name: node.name().to_string(),
            start_offset: range.start.offset,
            end_offset: range.end.offset,
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
/// How a step ended.
pub enum StepResult {
    /// The position changed.
    Moved,
    /// The position stayed put.
    Unchanged,
    /// The command was not recognised or had no position to act on.
    Unhandled,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
/// One command and its effect.
pub struct Step {
    /// Command string as given.
    pub command: String,
    /// How it ended.
    pub result: StepResult,
    /// Message key announced, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_key: Option<String>,
    /// Position after the command.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    /// Everything spoken while the command ran.
    #[serde(default)]
    pub spoken: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
/// Record of a batch run.
pub struct Transcript {
    /// Where the run started.
    pub start: Option<Position>,
    /// One entry per command.
    pub steps: Vec<Step>,
}

/// Host that writes everything it is asked to say into a buffer.
struct Recorder<'m> {
    messages: &'m Messages,
    spoken: Vec<String>,
}

impl Host for Recorder<'_> {
    fn present(&mut self, tree: &Tree, range: &Range, _previous: Option<&Range>, _event: OutputEvent) {
        self.spoken.push(output::describe(tree, range));
    }

    fn announce(&mut self, key: &'static str) {
        self.spoken.push(self.messages.get(key));
    }

    fn speak(&mut self, text: &str) {
        self.spoken.push(text.to_string());
    }

    fn activate(&mut self, tree: &Tree, node: NodeId) {
        let name = tree.node(node).map_or("", |n| n.name());
        self.spoken.push(self.messages.get_named("activated", name));
    }

    fn show_context_menu(&mut self, tree: &Tree, node: NodeId) {
        let name = tree.node(node).map_or("", |n| n.name());
        self.spoken.push(self.messages.get_named("context_menu", name));
    }
}

/// Run `commands` against `tree`, starting at its first leaf.
///
/// `readFromHere` is driven to completion within its step, each completion signal delivered as
/// soon as the previous output is recorded.
#[must_use]
pub fn run(tree: &Tree, commands: &[String], messages: &Messages) -> Transcript {
    let first = find_first(tree.root(), Direction::Forward, predicates::is_leaf);
    let mut session = first.map_or_else(Session::new, |leaf| Session::starting_at(Range::from_node(leaf)));
    let mut transcript = Transcript {
        start: session.current().and_then(|range| Position::of(tree, range)),
        steps: Vec::new(),
    };
    let mut recorder = Recorder {
        messages,
        spoken: Vec::new(),
    };

    for command in commands {
        let outcome = session.handle(tree, command, &mut recorder);
        let mut moved = false;
        // Every step moves at least one node, so the tree size bounds the loop.
        for _ in 0..tree.len() {
            match session.on_output_complete(tree, &mut recorder) {
                ReadStep::Continued(_) => moved = true,
                ReadStep::Finished => {
                    recorder.spoken.push(messages.get("reading_finished"));
                    break;
                }
                ReadStep::Idle => break,
            }
        }
        let (result, key) = match outcome {
            Outcome::Unhandled => (StepResult::Unhandled, None),
            Outcome::Unchanged { key } if !moved => (StepResult::Unchanged, key),
            Outcome::Unchanged { .. } | Outcome::Moved(_) => (StepResult::Moved, None),
        };
        transcript.steps.push(Step {
            command: command.clone(),
            result,
            message_key: key.map(str::to_string),
            position: session.current().and_then(|range| Position::of(tree, range)),
            spoken: std::mem::take(&mut recorder.spoken),
        });
    }
    transcript
}

#[cfg(test)]
#[path = "tests/transcript.rs"]
mod tests;
