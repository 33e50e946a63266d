//! Error types for navigation and document loading.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Why a navigation command did not produce a new position.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NavError {
    /// A predicate search exhausted its root without a match.
    #[error("no match ({key})")]
    NotFound {
        /// Message key describing the failed search.
        key: &'static str,
    },

    /// No table cell lies in the requested direction.
    #[error("no table cell ({key})")]
    StructuralGap {
        /// Message key describing the missing cell.
        key: &'static str,
    },

    /// The current position references a node no longer attached to the tree.
    #[error("current position is no longer in the tree")]
    InvalidPosition,

    /// The command has no movement and must be handled by the host.
    #[error("unhandled command: {command}")]
    Unhandled {
        /// Command as received.
        command: String,
    },
}

impl NavError {
    #[must_use]
    /// Message key to announce, if the error is user-visible.
    pub fn message_key(&self) -> Option<&'static str> {
        match self {
            Self::NotFound { key } | Self::StructuralGap { key } => Some(*key),
            Self::InvalidPosition | Self::Unhandled { .. } => None,
        }
    }
}

/// Failure to turn a file into nodes.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        /// File being read.
        path: PathBuf,
        /// Underlying failure.
        source: io::Error,
    },

    /// A JSON document did not describe a node tree.
    #[error("invalid node tree in {}: {source}", .path.display())]
    Json {
        /// File being parsed.
        path: PathBuf,
        /// Underlying failure.
        source: serde_json::Error,
    },

    /// The parser could not be set up or produced no tree.
    #[error("cannot parse {}: {reason}", .path.display())]
    Parse {
        /// File being parsed.
        path: PathBuf,
        /// What went wrong.
        reason: String,
    },

    /// No format handles the file's extension.
    #[error("no format for {}", .0.display())]
    Unsupported(PathBuf),
}
