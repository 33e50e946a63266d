//! The host side of the terminal UI: loaded documents, the navigation session and simulated speech.
//!
//! The UI plays the part of the host environment. It owns the node graph, maps key presses to
//! commands, shows each presented range as "speech" in the status area, and signals completion to
//! the session once the configured speech rate says the text would have been spoken. Default
//! actions toggle check boxes and mark links visited, mutating the graph between commands.

use crate::command::{Command, HeadingLevel, TableMove, Target};
use crate::config::Config;
use crate::cursor::{Range, Unit};
use crate::messages::Messages;
use crate::navigator::{find_first, find_next, Direction, FindOptions};
use crate::output;
use crate::predicates;
use crate::role::Role;
use crate::session::{Host, Outcome, OutputEvent, ReadStep, Session};
use crate::tree::{NodeId, Tree};
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Speech output, simulated: what is being said and when it will be done.
pub struct Speech {
    messages: Messages,
    config: Config,
    /// Text of the last presented range.
    pub spoken: Option<String>,
    /// Last announcement, such as a failed search.
    pub status: Option<String>,
    /// When the current utterance finishes.
    pub deadline: Option<Instant>,
    /// Node whose default action was requested, applied after the command returns.
    pending_activation: Option<NodeId>,
}

impl Speech {
    fn say(&mut self, text: String) {
        self.deadline = Some(Instant::now() + self.config.speech_duration(&text));
        self.spoken = Some(text);
    }
}

impl Host for Speech {
    fn present(&mut self, tree: &Tree, range: &Range, _previous: Option<&Range>, event: OutputEvent) {
        let text = output::describe(tree, range);
        if event == OutputEvent::Navigate {
            self.status = None;
        }
        self.say(text);
    }

    fn announce(&mut self, key: &'static str) {
        let text = self.messages.get(key);
        self.status = Some(text.clone());
        self.say(text);
    }

    fn speak(&mut self, text: &str) {
        self.status = Some(text.to_string());
        self.say(text.to_string());
    }

    fn activate(&mut self, _tree: &Tree, node: NodeId) {
        self.pending_activation = Some(node);
    }

    fn show_context_menu(&mut self, tree: &Tree, node: NodeId) {
        let name = tree.node(node).map_or("", |n| n.name());
        let text = self.messages.get_named("context_menu", name);
        self.status = Some(text.clone());
        self.say(text);
    }
}

/// One line of the outline view.
pub struct OutlineRow {
    /// Node shown on this line.
    pub node: NodeId,
    /// Depth below the desktop.
    pub depth: usize,
    /// Whether the node is the last child of its parent.
    pub is_last: bool,
    /// For each ancestor level, whether a later sibling still follows there.
    pub open_levels: Vec<bool>,
}

/// Single source of truth for the terminal UI.
pub struct AppState {
    /// The loaded desktop.
    pub tree: Tree,
    /// Files the desktop was built from.
    pub files: Vec<PathBuf>,
    /// Navigation state.
    pub session: Session,
    /// Simulated speech output.
    pub speech: Speech,
}

impl AppState {
    #[must_use]
    /// State positioned at the first leaf of `tree`.
    pub fn new(tree: Tree, files: Vec<PathBuf>, config: Config) -> Self {
        let session = find_first(tree.root(), Direction::Forward, predicates::is_leaf)
            .map_or_else(Session::new, |leaf| Session::starting_at(Range::from_node(leaf)));
        let messages = Messages::new(&config.locale);
        Self {
            tree,
            files,
            session,
            speech: Speech {
                messages,
                config,
                spoken: None,
                status: None,
                deadline: None,
                pending_activation: None,
            },
        }
    }

    /// Run `command` and apply any default action it requested.
    pub fn dispatch(&mut self, command: Command) -> Outcome {
        let outcome = self.session.execute(&self.tree, command, &mut self.speech);
        if outcome == Outcome::Unhandled {
            self.speech.status = Some(format!("{command}: nothing to act on"));
        }
        if let Some(node) = self.speech.pending_activation.take() {
            self.activate(node);
        }
        outcome
    }

    fn activate(&mut self, node: NodeId) {
        let Some(data) = self.tree.data_mut(node) else {
            return;
        };
        match data.role {
            Role::CheckBox | Role::Switch => data.checked = Some(!data.checked.unwrap_or(false)),
            Role::Link => data.visited = true,
            _ => {}
        }
        let name = data.name.clone();
        let text = self.speech.messages.get_named("activated", &name);
        self.speech.status = Some(text);
        if self.tree.node(node).is_some_and(|n| n.role().is_form_control()) {
            self.session.on_focus_changed(&self.tree, Some(node));
        }
    }

    /// Deliver the completion signal once the current utterance has finished.
    pub fn tick(&mut self, now: Instant) {
        let Some(deadline) = self.speech.deadline else {
            return;
        };
        if now < deadline {
            return;
        }
        self.speech.deadline = None;
        if self.session.on_output_complete(&self.tree, &mut self.speech) == ReadStep::Finished {
            self.speech.status = Some(self.speech.messages.get("reading_finished"));
        }
    }

    #[must_use]
    /// How long the event loop may wait before the next [`AppState::tick`] is due.
    pub fn poll_timeout(&self, now: Instant) -> Duration {
        self.speech
            .deadline
            .map_or(Duration::from_millis(250), |d| d.saturating_duration_since(now))
    }

    #[must_use]
    /// Every attached node in document order, with what the outline needs to draw it.
    pub fn outline(&self) -> Vec<OutlineRow> {
        crate::navigator::Traversal::new(self.tree.root(), Direction::Forward)
            .map(|node| {
                let mut open_levels: Vec<bool> = node
                    .ancestors()
                    .filter(|a| a.parent().is_some())
                    .map(|a| a.next_sibling().is_some())
                    .collect();
                open_levels.reverse();
                OutlineRow {
                    node: node.id(),
                    depth: open_levels.len() + usize::from(node.parent().is_some()),
                    is_last: node.next_sibling().is_none(),
                    open_levels,
                }
            })
            .collect()
    }

    #[must_use]
    /// Nodes covered by the current range.
    pub fn highlighted(&self) -> HashSet<NodeId> {
        let mut nodes = HashSet::new();
        let Some(range) = self.session.current() else {
            return nodes;
        };
        let Some(mut cur) = self.tree.node(range.start.node) else {
            return nodes;
        };
        nodes.insert(cur.id());
        while cur.id() != range.end.node {
            let opts = FindOptions::skipping_ancestry().atomic();
            match find_next(cur, Direction::Forward, predicates::is_leaf, opts) {
                Some(next) => cur = next,
                None => break,
            }
            nodes.insert(cur.id());
        }
        nodes
    }
}

/// Host command table: the command a key press stands for.
#[must_use]
pub fn command_for_key(key: KeyEvent) -> Option<Command> {
    use Direction::{Backward, Forward};
    let alt = key.modifiers.contains(KeyModifiers::ALT);
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let command = match key.code {
        KeyCode::Down if alt => Command::Table(TableMove::NextRow),
        KeyCode::Up if alt => Command::Table(TableMove::PreviousRow),
        KeyCode::Right if alt => Command::Table(TableMove::NextCol),
        KeyCode::Left if alt => Command::Table(TableMove::PreviousCol),
        KeyCode::Home if alt => Command::Table(TableMove::RowFirstCell),
        KeyCode::End if alt => Command::Table(TableMove::RowLastCell),
        KeyCode::PageUp if alt => Command::Table(TableMove::ColFirstCell),
        KeyCode::PageDown if alt => Command::Table(TableMove::ColLastCell),
        KeyCode::Home if ctrl => Command::Table(TableMove::FirstCell),
        KeyCode::End if ctrl => Command::Table(TableMove::LastCell),
        KeyCode::Home => Command::JumpToTop,
        KeyCode::End => Command::JumpToBottom,
        KeyCode::Char('t') if ctrl => Command::ReadCurrentTitle,
        KeyCode::Char('u') if ctrl => Command::ReadCurrentUrl,
        KeyCode::Menu => Command::ContextMenu,
        KeyCode::Right => Command::Move(Unit::Node, Forward),
        KeyCode::Left => Command::Move(Unit::Node, Backward),
        KeyCode::Down => Command::Move(Unit::Line, Forward),
        KeyCode::Up => Command::Move(Unit::Line, Backward),
        KeyCode::Enter => Command::ForceClickOnCurrentItem,
        KeyCode::Esc => Command::StopSpeech,
        KeyCode::Char(c @ '1'..='6') => {
            let level = c.to_digit(10).and_then(|d| u8::try_from(d).ok());
            let target = Target::Heading(level.and_then(HeadingLevel::from_number));
            Command::Find(target, if alt { Backward } else { Forward })
        }
        KeyCode::Char(c) => {
            let dir = if c.is_uppercase() { Backward } else { Forward };
            match c.to_ascii_lowercase() {
                'c' => Command::Move(Unit::Character, dir),
                'w' => Command::Move(Unit::Word, dir),
                'h' => Command::Find(Target::Heading(None), dir),
                'l' => Command::Find(Target::Link, dir),
                'v' => Command::Find(Target::VisitedLink, dir),
                'b' => Command::Find(Target::Button, dir),
                'x' => Command::Find(Target::Checkbox, dir),
                'm' => Command::Find(Target::ComboBox, dir),
                'e' => Command::Find(Target::EditText, dir),
                'f' => Command::Find(Target::FormField, dir),
                't' => Command::Find(Target::Table, dir),
                'r' => Command::ReadFromHere,
                's' => Command::StopSpeech,
                _ => return None,
            }
        }
        _ => return None,
    };
    Some(command)
}

#[cfg(test)]
#[path = "tests/app_state.rs"]
mod tests;
