//! XML parser adapter
//!
//! Builds the document tree from `quick-xml` events. Comments become
//! first-class nodes; text before an element's first child is its `text`,
//! text after a child is that child's `tail`.
//!
//! Line endings are normalized to `\n` in character data and comments, and
//! literal whitespace in attribute values collapses to single spaces, as an
//! XML 1.0 processor would report them.

use crate::domain::model::Node;
use crate::utils::error::{Result, TransitError};
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::borrow::Cow;

fn malformed(position: usize, message: impl Into<String>) -> TransitError {
    TransitError::MalformedInput {
        position,
        message: message.into(),
    }
}

/// `\r\n` and lone `\r` become `\n`.
fn normalize_newlines(raw: &str) -> Cow<'_, str> {
    if raw.contains('\r') {
        Cow::Owned(raw.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(raw)
    }
}

/// Literal tabs and line breaks in an attribute value read as spaces.
/// Character references such as `&#9;` are expanded afterwards and survive.
fn normalize_attribute(raw: &str) -> String {
    normalize_newlines(raw)
        .chars()
        .map(|c| if matches!(c, '\t' | '\n') { ' ' } else { c })
        .collect()
}

fn decode(raw: &[u8], position: usize) -> Result<String> {
    let raw = String::from_utf8_lossy(raw);
    let text = unescape(&normalize_newlines(&raw))
        .map_err(|e| malformed(position, e.to_string()))?
        .into_owned();
    Ok(text)
}

fn element_from(start: &BytesStart<'_>, position: usize) -> Result<Node> {
    let tag = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut node = Node::element(tag);

    for attribute in start.attributes() {
        let attribute = attribute.map_err(|e| malformed(position, e.to_string()))?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let raw = normalize_attribute(&String::from_utf8_lossy(&attribute.value));
        let value = unescape(&raw).map_err(|e| malformed(position, e.to_string()))?;
        node.set_attr(key, value.into_owned());
    }

    Ok(node)
}

fn append(slot: &mut Option<String>, text: &str) {
    slot.get_or_insert_with(String::new).push_str(text);
}

/// Routes character data to the open element's text or its last child's tail.
fn append_text(stack: &mut [Node], text: &str, position: usize) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => {
            match parent.children.last_mut() {
                Some(last) => append(&mut last.tail, text),
                None => append(&mut parent.text, text),
            }
            Ok(())
        }
        None if text.trim().is_empty() => Ok(()),
        None => Err(malformed(position, "text outside the root element")),
    }
}

fn attach(stack: &mut [Node], root: &mut Option<Node>, node: Node, position: usize) -> Result<()> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(node);
        return Ok(());
    }
    if root.is_some() {
        return Err(malformed(position, "more than one root element"));
    }
    *root = Some(node);
    Ok(())
}

/// Parses an XML document into its root node.
pub fn parse_document(source: &str) -> Result<Node> {
    let mut reader = Reader::from_str(source);
    reader.trim_text(false);

    let mut stack: Vec<Node> = Vec::new();
    let mut root: Option<Node> = None;

    loop {
        let position = reader.buffer_position();
        match reader.read_event() {
            Ok(Event::Start(start)) => {
                if stack.is_empty() && root.is_some() {
                    return Err(malformed(position, "more than one root element"));
                }
                stack.push(element_from(&start, position)?);
            }
            Ok(Event::Empty(start)) => {
                let node = element_from(&start, position)?;
                attach(&mut stack, &mut root, node, position)?;
            }
            Ok(Event::End(_)) => {
                let node = stack
                    .pop()
                    .ok_or_else(|| malformed(position, "closing tag without an open element"))?;
                attach(&mut stack, &mut root, node, position)?;
            }
            Ok(Event::Text(text)) => {
                let text = decode(&text, position)?;
                append_text(&mut stack, &text, position)?;
            }
            Ok(Event::CData(data)) => {
                let data = data.into_inner();
                let data = String::from_utf8_lossy(&data);
                append_text(&mut stack, &normalize_newlines(&data), position)?;
            }
            Ok(Event::Comment(comment)) => {
                // Comments outside the root element are not part of the tree.
                if let Some(parent) = stack.last_mut() {
                    let raw = String::from_utf8_lossy(&comment);
                    let content = normalize_newlines(&raw).into_owned();
                    parent.children.push(Node::comment(content));
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(malformed(reader.buffer_position(), e.to_string())),
        }
    }

    if let Some(open) = stack.last() {
        return Err(malformed(
            reader.buffer_position(),
            format!("unclosed element <{}>", open.tag().unwrap_or_default()),
        ));
    }

    root.ok_or_else(|| malformed(0, "document has no root element"))
}

/// Parses raw bytes, rejecting input that is not UTF-8.
pub fn parse_bytes(bytes: &[u8]) -> Result<Node> {
    let source = std::str::from_utf8(bytes)
        .map_err(|e| malformed(e.valid_up_to(), format!("input is not valid UTF-8: {}", e)))?;
    parse_document(source)
}
