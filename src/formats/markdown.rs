//! Markdown format implementation using tree-sitter-md.
//!
//! The block grammar gives headings, paragraphs, lists, quotes, code and pipe tables. Paragraph
//! text is handed to the inline grammar, whose link nodes are picked out with a query so that a
//! paragraph becomes a run of text and link leaves.

use super::{document_root, Format};
use crate::error::LoadError;
use crate::role::Role;
use crate::tree::{CellCoords, NodeData, NodeId, Tree};
use std::path::Path;
use streaming_iterator::StreamingIterator;
use tree_sitter::{Node as SyntaxNode, Parser, Query, QueryCursor};

/// Builds documents from CommonMark/GFM source.
pub struct MarkdownFormat;

const LINK_QUERY: &str = "(inline_link (link_text) @text) @link\n(uri_autolink) @link";

impl Format for MarkdownFormat {
    fn file_extension(&self) -> &'static str {
        "md"
    }

    fn build(
        &self,
        source: &str,
        path: &Path,
        tree: &mut Tree,
        parent: NodeId,
    ) -> Result<NodeId, LoadError> {
        let parse_error = |reason: String| LoadError::Parse {
            path: path.to_path_buf(),
            reason,
        };
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_md::LANGUAGE.into())
            .map_err(|e| parse_error(e.to_string()))?;
        let syntax = parser
            .parse(source, None)
            .ok_or_else(|| parse_error("parser produced no tree".to_string()))?;
        let inline = Inline::new().map_err(parse_error)?;

        let doc = document_root(tree, parent, path);
        let mut builder = Builder {
            source,
            tree,
            inline,
        };
        builder.walk(syntax.root_node(), doc);
        Ok(doc)
    }
}

enum Segment {
    Text(String),
    Link { label: String, url: Option<String> },
}

/// Parser and link query for inline content.
struct Inline {
    parser: Parser,
    query: Query,
}

impl Inline {
    fn new() -> Result<Self, String> {
        let language: tree_sitter::Language = tree_sitter_md::INLINE_LANGUAGE.into();
        let mut parser = Parser::new();
        parser
            .set_language(&language)
            .map_err(|e| e.to_string())?;
        let query = Query::new(&language, LINK_QUERY).map_err(|e| e.to_string())?;
        Ok(Self { parser, query })
    }

    /// Split inline `text` into plain runs and links, in order.
    fn segments(&mut self, text: &str) -> Vec<Segment> {
        let Some(syntax) = self.parser.parse(text, None) else {
            return vec![Segment::Text(text.to_string())];
        };
        let names = self.query.capture_names();
        let mut links: Vec<(usize, usize, Segment)> = Vec::new();
        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(&self.query, syntax.root_node(), text.as_bytes());
        while let Some(m) = matches.next() {
            let mut link = None;
            let mut label = None;
            for capture in m.captures {
                let name = usize::try_from(capture.index)
                    .ok()
                    .and_then(|i| names.get(i));
                match name {
                    Some(&"link") => link = Some(capture.node),
                    Some(&"text") => label = Some(capture.node),
                    _ => {}
                }
            }
            let Some(link) = link else { continue };
            let segment = match label {
                Some(label) => Segment::Link {
                    label: text_of(label, text).to_string(),
                    url: child_of_kind(link, "link_destination")
                        .map(|dest| text_of(dest, text).to_string()),
                },
                None => {
                    let uri = text_of(link, text).trim_matches(['<', '>']).to_string();
                    Segment::Link {
                        label: uri.clone(),
                        url: Some(uri),
                    }
                }
            };
            links.push((link.start_byte(), link.end_byte(), segment));
        }
        links.sort_by_key(|(start, _, _)| *start);

        let mut segments = Vec::new();
        let mut pos = 0;
        for (start, end, link) in links {
            if start < pos {
                continue;
            }
            if let Some(run) = text.get(pos..start) {
                segments.push(Segment::Text(run.to_string()));
            }
            segments.push(link);
            pos = end;
        }
        if let Some(rest) = text.get(pos..) {
            segments.push(Segment::Text(rest.to_string()));
        }
        segments
    }
}

fn text_of<'s>(node: SyntaxNode<'_>, source: &'s str) -> &'s str {
    source.get(node.byte_range()).unwrap_or_default()
}

fn child_of_kind<'a>(node: SyntaxNode<'a>, kind: &str) -> Option<SyntaxNode<'a>> {
    let mut cursor = node.walk();
    let found = node.named_children(&mut cursor).find(|c| c.kind() == kind);
    found
}

/// Join the lines of a block into one line of text.
fn one_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

struct Builder<'a> {
    source: &'a str,
    tree: &'a mut Tree,
    inline: Inline,
}

impl Builder<'_> {
    fn append(&mut self, parent: NodeId, data: NodeData) -> NodeId {
        self.tree.append(parent, data)
    }

    /// Walk the block syntax tree with an explicit stack, appending nodes under `doc`.
    fn walk(&mut self, root: SyntaxNode<'_>, doc: NodeId) {
        let mut stack = vec![(root, doc)];
        while let Some((node, parent)) = stack.pop() {
            let Some(children_parent) = self.visit(node, parent) else {
                continue;
            };
            let task = is_task_item(node);
            let mut cursor = node.walk();
            let children: Vec<_> = node
                .named_children(&mut cursor)
                .filter(|c| !is_markup(c.kind()) && !(task && c.kind() == "paragraph"))
                .collect();
            stack.extend(children.into_iter().rev().map(|c| (c, children_parent)));
        }
    }

    /// Append whatever `node` becomes; returns the parent for its children when they should be
    /// walked too.
    fn visit(&mut self, node: SyntaxNode<'_>, parent: NodeId) -> Option<NodeId> {
        match node.kind() {
            "atx_heading" => {
                let level = node
                    .child(0)
                    .and_then(|marker| marker.kind().strip_prefix("atx_h"))
                    .and_then(|rest| rest.strip_suffix("_marker"))
                    .and_then(|digit| digit.parse().ok())
                    .unwrap_or(1);
                let title = child_of_kind(node, "inline").map_or("", |t| text_of(t, self.source));
                self.append(
                    parent,
                    NodeData::new(Role::Heading)
                        .with_name(one_line(title))
                        .with_level(level),
                );
                None
            }
            "setext_heading" => {
                let level = if child_of_kind(node, "setext_h1_underline").is_some() {
                    1
                } else {
                    2
                };
                let title =
                    child_of_kind(node, "paragraph").map_or("", |p| text_of(p, self.source));
                self.append(
                    parent,
                    NodeData::new(Role::Heading)
                        .with_name(one_line(title))
                        .with_level(level),
                );
                None
            }
            "paragraph" => {
                let paragraph = self.append(parent, NodeData::new(Role::Paragraph));
                if let Some(inline) = child_of_kind(node, "inline") {
                    let text = text_of(inline, self.source).trim_end();
                    self.inline_leaves(text, paragraph);
                }
                None
            }
            "list" => Some(self.append(parent, NodeData::new(Role::List))),
            "list_item" => {
                let item = self.append(parent, NodeData::new(Role::ListItem));
                if is_task_item(node) {
                    let checked = child_of_kind(node, "task_list_marker_checked").is_some();
                    let label =
                        child_of_kind(node, "paragraph").map_or("", |p| text_of(p, self.source));
                    self.append(
                        item,
                        NodeData::new(Role::CheckBox)
                            .with_name(one_line(label))
                            .with_checked(checked),
                    );
                }
                Some(item)
            }
            "block_quote" => Some(self.append(parent, NodeData::new(Role::Blockquote))),
            "fenced_code_block" | "indented_code_block" => {
                let body = child_of_kind(node, "code_fence_content").unwrap_or(node);
                let code = text_of(body, self.source).trim_end().to_string();
                self.append(parent, NodeData::new(Role::Code).with_name(code));
                None
            }
            "pipe_table" => {
                self.table(node, parent);
                None
            }
            "thematic_break" | "link_reference_definition" | "html_block" => None,
            _ => Some(parent),
        }
    }

    fn table(&mut self, node: SyntaxNode<'_>, parent: NodeId) {
        let table = self.append(parent, NodeData::new(Role::Table));
        let mut cursor = node.walk();
        let rows: Vec<_> = node
            .named_children(&mut cursor)
            .filter(|r| matches!(r.kind(), "pipe_table_header" | "pipe_table_row"))
            .collect();
        for (r, row_node) in rows.into_iter().enumerate() {
            let role = if row_node.kind() == "pipe_table_header" {
                Role::ColumnHeader
            } else {
                Role::Cell
            };
            let row = self.append(table, NodeData::new(Role::Row));
            let mut cells = row_node.walk();
            let cells: Vec<_> = row_node
                .named_children(&mut cells)
                .filter(|c| c.kind() == "pipe_table_cell")
                .collect();
            for (c, cell) in cells.into_iter().enumerate() {
                let name = text_of(cell, self.source).trim().to_string();
                self.append(
                    row,
                    NodeData::new(role)
                        .with_name(name)
                        .with_coords(CellCoords::new(r, c)),
                );
            }
        }
    }

    /// Append text, line break and link leaves for one paragraph's inline content.
    fn inline_leaves(&mut self, text: &str, paragraph: NodeId) {
        for segment in self.inline.segments(text) {
            match segment {
                Segment::Text(run) => {
                    for (i, line) in run.split('\n').enumerate() {
                        if i > 0 {
                            self.append(paragraph, NodeData::new(Role::LineBreak));
                        }
                        let line = line.trim();
                        if !line.is_empty() {
                            self.append(
                                paragraph,
                                NodeData::new(Role::StaticText).with_name(line),
                            );
                        }
                    }
                }
                Segment::Link { label, url } => {
                    let mut link = NodeData::new(Role::Link).with_name(one_line(&label));
                    link.url = url;
                    self.append(paragraph, link);
                }
            }
        }
    }
}

/// Whether a list item starts with a `[ ]` or `[x]` marker.
fn is_task_item(node: SyntaxNode<'_>) -> bool {
    node.kind() == "list_item"
        && (child_of_kind(node, "task_list_marker_checked").is_some()
            || child_of_kind(node, "task_list_marker_unchecked").is_some())
}

/// Syntax nodes that only carry markup.
fn is_markup(kind: &str) -> bool {
    kind.starts_with("list_marker")
        || kind.starts_with("task_list_marker")
        || kind.starts_with("block_quote_marker")
        || kind.starts_with("block_continuation")
}

#[cfg(test)]
#[path = "../tests/markdown.rs"]
mod tests;
