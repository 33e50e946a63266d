//! Finding documents on disk and loading them into one desktop graph.

use crate::error::LoadError;
use crate::formats;
use crate::role::Role;
use crate::tree::{NodeData, NodeId, Tree};
use std::path::{Path, PathBuf};
use std::{fs, io};
use tracing::{debug, warn};

/// Expand `paths` into the document files to load.
///
/// Directories are searched recursively for files whose extension is in `extensions`; files named
/// explicitly are kept whatever their extension. With no paths, the working directory is searched.
/// The result is sorted and free of duplicates.
///
/// # Errors
///
/// Returns an error if a path does not exist or a directory cannot be read.
pub fn find_documents(paths: Vec<PathBuf>, extensions: &[String]) -> io::Result<Vec<PathBuf>> {
    let roots = if paths.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        paths
    };
    let matches_ext = |path: &Path| {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| extensions.iter().any(|x| x == e))
    };

    let mut found = Vec::new();
    let mut dirs = Vec::new();
    for root in roots {
        if fs::metadata(&root)?.is_dir() {
            dirs.push(root);
        } else {
            found.push(root);
        }
    }
    while let Some(dir) = dirs.pop() {
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.is_dir() {
                dirs.push(path);
            } else if matches_ext(&path) {
                found.push(path);
            }
        }
    }
    found.sort();
    found.dedup();
    Ok(found)
}

/// Parse the file at `path` and append its document under `parent`.
///
/// # Errors
///
/// Returns an error if the file has no known format, cannot be read, or cannot be parsed.
pub fn load_document(tree: &mut Tree, parent: NodeId, path: &Path) -> Result<NodeId, LoadError> {
    let format = path
        .extension()
        .and_then(|e| e.to_str())
        .and_then(formats::for_extension)
        .ok_or_else(|| LoadError::Unsupported(path.to_path_buf()))?;
    let source = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let doc = format.build(&source, path, tree, parent)?;
    debug!(path = %path.display(), format = format.file_extension(), nodes = tree.len(), "loaded");
    Ok(doc)
}

/// Build a desktop holding one document per file.
///
/// Files that fail to load are skipped; their errors are returned alongside the tree.
pub fn load_desktop(files: &[PathBuf]) -> (Tree, Vec<LoadError>) {
    let mut tree = Tree::new(NodeData::new(Role::Desktop).with_name("desktop"));
    let desktop = tree.root_id();
    let mut errors = Vec::new();
    for file in files {
        if let Err(err) = load_document(&mut tree, desktop, file) {
            warn!(%err, "skipping document");
            errors.push(err);
        }
    }
    (tree, errors)
}

#[cfg(test)]
#[path = "tests/input.rs"]
mod tests;
