//! JSON node trees.
//!
//! A JSON document is a single node object:
//!
//! ```json
//! {"role": "dialog", "name": "Settings", "children": [
//!     {"role": "textField", "name": "Name"},
//!     {"role": "button", "name": "Save"}
//! ]}
//! ```
//!
//! A top-level `rootWebArea` becomes the document itself; any other role is placed inside a
//! document named after the file.

use super::{document_root, Format};
use crate::error::LoadError;
use crate::role::Role;
use crate::tree::{CellCoords, NodeData, NodeId, Tree};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Builds documents from JSON node descriptions.
pub struct JsonFormat;

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
/// One node as written in a JSON document.
pub struct JsonNode {
    /// Content category.
    pub role: Role,
    #[serde(default)]
    /// Accessible name.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Heading level.
    pub level: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Table cell coordinates.
    pub cell: Option<CellCoords>,
    #[serde(default)]
    /// Visited flag of links.
    pub visited: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Check state.
    pub checked: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Link target.
    pub url: Option<String>,
    #[serde(default)]
    /// Child nodes in document order.
    pub children: Vec<JsonNode>,
}

impl JsonNode {
    fn data(&self) -> NodeData {
        NodeData {
            role: self.role,
            name: self.name.clone(),
            level: self.level,
            cell: self.cell,
            visited: self.visited,
            checked: self.checked,
            url: self.url.clone(),
        }
    }
}

impl Format for JsonFormat {
    fn file_extension(&self) -> &'static str {
        "json"
    }

    fn build(
        &self,
        source: &str,
        path: &Path,
        tree: &mut Tree,
        parent: NodeId,
    ) -> Result<NodeId, LoadError> {
        let top: JsonNode = serde_json::from_str(source).map_err(|source| LoadError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        let (doc, pending) = if top.role == Role::RootWebArea {
            let mut data = top.data();
            if data.url.is_none() {
                data.url = Some(path.display().to_string());
            }
            (tree.append(parent, data), top.children.iter().collect::<Vec<_>>())
        } else {
            (document_root(tree, parent, path), vec![&top])
        };

        let mut stack: Vec<(&JsonNode, NodeId)> = pending.into_iter().rev().map(|n| (n, doc)).collect();
        while let Some((node, parent)) = stack.pop() {
            let id = tree.append(parent, node.data());
            stack.extend(node.children.iter().rev().map(|c| (c, id)));
        }
        Ok(doc)
    }
}

#[cfg(test)]
#[path = "../tests/json.rs"]
mod tests;
