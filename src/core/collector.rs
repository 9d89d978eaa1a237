//! Annotated-text collection
//!
//! Walks the document depth-first in reading order and picks up every text
//! fragment whose trimmed form starts with `||`, plus every comment rendered
//! as a fenced block. The output order is the order a reader meets these
//! fragments in the markup, including text trailing a comment or a closing
//! tag.

use crate::domain::model::{Node, ANNOTATION_MARKER, COMMENT_FENCE_CLOSE, COMMENT_FENCE_OPEN};

fn annotation(text: Option<&str>) -> Option<&str> {
    text.map(str::trim)
        .filter(|trimmed| trimmed.starts_with(ANNOTATION_MARKER))
}

fn push_annotation(text: Option<&str>, lines: &mut Vec<String>) {
    if let Some(line) = annotation(text) {
        lines.push(line.to_string());
    }
}

/// Comment bodies are copied line by line without trimming.
fn push_comment_block(content: &str, lines: &mut Vec<String>) {
    lines.push(COMMENT_FENCE_OPEN.to_string());
    lines.extend(content.lines().map(str::to_string));
    lines.push(COMMENT_FENCE_CLOSE.to_string());
}

fn traverse(node: &Node, lines: &mut Vec<String>) {
    push_annotation(node.text.as_deref(), lines);

    for child in &node.children {
        if child.is_comment() {
            push_comment_block(child.text.as_deref().unwrap_or(""), lines);
            push_annotation(child.tail.as_deref(), lines);
        } else {
            traverse(child, lines);
        }
    }

    push_annotation(node.tail.as_deref(), lines);
}

/// Collects annotation lines and fenced comments under `root`.
pub fn collect_annotations(root: &Node) -> Vec<String> {
    let mut lines = Vec::new();
    traverse(root, &mut lines);
    tracing::debug!("Collected {} annotation lines", lines.len());
    lines
}
