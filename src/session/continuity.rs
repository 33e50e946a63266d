//! Continuous forward reading.
//!
//! Reading is a flag on the session plus a step function. [`Session::read_from_here`] presents
//! the current range and raises the flag; each time the host finishes outputting a step it calls
//! [`Session::on_output_complete`], which advances one object and presents it. The flag is only
//! looked at between steps, so stopping never interrupts a step in progress.

use super::{Host, Outcome, OutputEvent, Session};
use crate::cursor::{Range, Unit};
use crate::navigator::Direction;
use crate::role::Role;
use crate::tree::Tree;
use tracing::info;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Result of one completion signal.
pub enum ReadStep {
    /// Reading advanced to a new range.
    Continued(Range),
    /// Reading reached its end and stopped.
    Finished,
    /// Reading was not active.
    Idle,
}

/// Whether `range` sits on a document that hangs directly off the desktop, meaning the walk has
/// wrapped back to the top of a page.
fn wrapped(tree: &Tree, range: &Range) -> bool {
    let Some(node) = tree.node(range.start.node) else {
        return true;
    };
    node.role() == Role::RootWebArea
        && node
            .parent()
            .is_some_and(|parent| parent.root().role() == Role::Desktop)
}

impl Session {
    /// Present the current range and start reading forward from it.
    pub fn read_from_here(&mut self, tree: &Tree, host: &mut impl Host) -> Outcome {
        let Some(current) = self.current else {
            return Outcome::Unhandled;
        };
        info!(start = %current.start.node, "continuous reading started");
        self.reading = true;
        host.present(tree, &current, None, OutputEvent::Read);
        Outcome::Unchanged { key: None }
    }

    /// Clear the reading flag; the next completion signal will not advance.
    pub fn stop_reading(&mut self) {
        if self.reading {
            info!("continuous reading stopped");
        }
        self.reading = false;
    }

    /// The host finished outputting the last presented range: advance one object if reading.
    pub fn on_output_complete(&mut self, tree: &Tree, host: &mut impl Host) -> ReadStep {
        if !self.reading {
            return ReadStep::Idle;
        }
        self.validate(tree);
        let Some(previous) = self.current else {
            self.finish("no position");
            return ReadStep::Finished;
        };
        let next = previous.move_by(tree, Unit::Node, Direction::Forward);
        if next == previous {
            self.finish("end of content");
            return ReadStep::Finished;
        }
        if wrapped(tree, &next) {
            self.finish("wrapped to document");
            return ReadStep::Finished;
        }
        self.current = Some(next);
        host.present(tree, &next, Some(&previous), OutputEvent::Read);
        ReadStep::Continued(next)
    }

    fn finish(&mut self, reason: &str) {
        info!(reason, "continuous reading finished");
        self.reading = false;
    }
}
