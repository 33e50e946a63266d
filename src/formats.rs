//! Format trait and implementations for the document types the host can load.
//!
//! A format turns the text of one file into a `rootWebArea` subtree of the node graph. Markdown
//! is parsed with tree-sitter; JSON files describe an arbitrary node tree directly, which is how
//! UI-like documents full of controls are written.

pub mod json;
pub mod markdown;

use crate::error::LoadError;
use crate::role::Role;
use crate::tree::{NodeData, NodeId, Tree};
use std::path::Path;

/// Builds a document subtree from source text.
pub trait Format {
    /// File suffix handled, without the dot.
    fn file_extension(&self) -> &'static str;

    /// Append the document parsed from `source` under `parent` and return its root.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be parsed.
    fn build(
        &self,
        source: &str,
        path: &Path,
        tree: &mut Tree,
        parent: NodeId,
    ) -> Result<NodeId, LoadError>;
}

#[must_use]
/// Format handling files with extension `ext`.
pub fn for_extension(ext: &str) -> Option<Box<dyn Format>> {
    match ext {
        "md" | "markdown" => Some(Box::new(markdown::MarkdownFormat)),
        "json" => Some(Box::new(json::JsonFormat)),
        _ => None,
    }
}

/// Document root node for the file at `path`.
fn document_root(tree: &mut Tree, parent: NodeId, path: &Path) -> NodeId {
    let title = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
    tree.append(
        parent,
        NodeData::new(Role::RootWebArea)
            .with_name(title)
            .with_url(path.display().to_string()),
    )
}
