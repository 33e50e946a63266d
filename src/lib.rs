//! docnav: directional navigation and predicate search over document trees.
//!
//! The library is the navigation core of a screen reader: given a tree of content nodes and a
//! current position, it computes where a command such as "next heading", "next object" or "cell
//! below" lands. The pieces, leaf first:
//!
//! - [`tree`]: the node graph, an arena the core reads through borrowed [`tree::Node`] handles.
//! - [`predicates`]: pure node tests and the table-cell predicate factory.
//! - [`navigator`]: pre-order and reverse pre-order searches bounded by a root predicate.
//! - [`cursor`]: positions and unit movement by character, word, line and object.
//! - [`command`]: the closed command set and what each command resolves to.
//! - [`session`]: the current position, focus repair, the resolver and continuous reading.
//!
//! The remaining modules make up the `docnav` binary, which loads Markdown and JSON documents
//! into one desktop and acts as the host.
#![allow(clippy::multiple_crate_versions)]

pub mod app_state;
pub mod command;
pub mod config;
pub mod cursor;
pub mod error;
pub mod formats;
pub mod input;
pub mod messages;
pub mod navigator;
pub mod output;
pub mod predicates;
pub mod role;
pub mod session;
pub mod transcript;
pub mod tree;
pub mod ui;
