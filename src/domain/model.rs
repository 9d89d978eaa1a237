use indexmap::IndexMap;
use std::collections::BTreeMap;

pub const EXPRESSION_PREFIX: &str = "@{";
pub const EXPRESSION_SUFFIX: &str = "}";
pub const ANNOTATION_MARKER: &str = "||";
pub const COMMENT_FENCE_OPEN: &str = "<!--";
pub const COMMENT_FENCE_CLOSE: &str = "-->";

/// Discriminant of a document node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Element {
        tag: String,
        attributes: BTreeMap<String, String>,
    },
    /// A comment node; its literal content is stored as the node's text.
    Comment,
}

/// One node of the parsed document tree.
///
/// `text` is the content before the first child, `tail` is the content that
/// follows this node's closing boundary inside its parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    pub text: Option<String>,
    pub tail: Option<String>,
    pub children: Vec<Node>,
}

impl Node {
    pub fn element(tag: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Element {
                tag: tag.into(),
                attributes: BTreeMap::new(),
            },
            text: None,
            tail: None,
            children: Vec::new(),
        }
    }

    pub fn comment(content: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Comment,
            text: Some(content.into()),
            tail: None,
            children: Vec::new(),
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_tail(mut self, tail: impl Into<String>) -> Self {
        self.tail = Some(tail.into());
        self
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    /// Sets an attribute; a no-op on comment nodes.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        if let NodeKind::Element { attributes, .. } = &mut self.kind {
            attributes.insert(name.into(), value.into());
        }
    }

    pub fn is_comment(&self) -> bool {
        matches!(self.kind, NodeKind::Comment)
    }

    pub fn tag(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Element { tag, .. } => Some(tag),
            NodeKind::Comment => None,
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        match &self.kind {
            NodeKind::Element { attributes, .. } => attributes.get(name).map(String::as_str),
            NodeKind::Comment => None,
        }
    }

    /// Leading text, trimmed; empty when absent.
    pub fn trimmed_text(&self) -> &str {
        self.text.as_deref().map(str::trim).unwrap_or("")
    }

    /// Direct element children carrying `tag`, in document order.
    pub fn children_named<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Node> + 'a {
        self.children
            .iter()
            .filter(move |child| child.tag() == Some(tag))
    }

    /// First descendant element carrying `tag` in depth-first document order.
    /// The node itself is not considered.
    pub fn find(&self, tag: &str) -> Option<&Node> {
        for child in &self.children {
            if child.tag() == Some(tag) {
                return Some(child);
            }
            if let Some(found) = child.find(tag) {
                return Some(found);
            }
        }
        None
    }
}

/// Named constants in declaration order.
///
/// Redeclaring a name replaces its value but keeps the original position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConstantTable {
    entries: IndexMap<String, String>,
}

impl ConstantTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the previous value when `name` was already declared.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ConstantTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (name, value) in iter {
            table.insert(name, value);
        }
        table
    }
}

pub type DictionaryItems = Vec<(String, String)>;

/// Named dictionaries in declaration order, each holding its items in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DictionaryTable {
    entries: IndexMap<String, DictionaryItems>,
}

impl DictionaryTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, items: DictionaryItems) -> Option<DictionaryItems> {
        self.entries.insert(name.into(), items)
    }

    pub fn get(&self, name: &str) -> Option<&DictionaryItems> {
        self.entries.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DictionaryItems)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The finished line sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    pub lines: Vec<String>,
}

impl Report {
    pub fn new(lines: Vec<String>) -> Self {
        Self { lines }
    }

    /// Every line followed by a newline terminator.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.lines.iter().map(|l| l.len() + 1).sum());
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        out
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_is_depth_first_and_skips_self() {
        let root = Node::element("constants").with_child(
            Node::element("outer")
                .with_child(Node::element("constants").with_attr("id", "nested")),
        );

        let found = root.find("constants").unwrap();
        assert_eq!(found.attr("id"), Some("nested"));
        assert!(root.find("dicts").is_none());
    }

    #[test]
    fn test_children_named_ignores_comments_and_other_tags() {
        let root = Node::element("constants")
            .with_child(Node::element("const").with_attr("name", "A"))
            .with_child(Node::comment(" note "))
            .with_child(Node::element("other"))
            .with_child(Node::element("const").with_attr("name", "B"));

        let names: Vec<_> = root
            .children_named("const")
            .filter_map(|c| c.attr("name"))
            .collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn test_constant_table_overwrite_keeps_position() {
        let mut table = ConstantTable::new();
        table.insert("A", "1");
        table.insert("B", "2");
        assert_eq!(table.insert("A", "3"), Some("1".to_string()));

        let entries: Vec<_> = table.iter().collect();
        assert_eq!(entries, vec![("A", "3"), ("B", "2")]);
    }

    #[test]
    fn test_report_render_terminates_every_line() {
        let report = Report::new(vec!["a".into(), String::new(), "c".into()]);
        assert_eq!(report.render(), "a\n\nc\n");
        assert_eq!(Report::default().render(), "");
    }

    #[test]
    fn test_comment_has_no_tag_or_attributes() {
        let mut comment = Node::comment("x");
        comment.set_attr("k", "v");
        assert!(comment.is_comment());
        assert_eq!(comment.tag(), None);
        assert_eq!(comment.attr("k"), None);
        assert_eq!(comment.trimmed_text(), "x");
    }
}
