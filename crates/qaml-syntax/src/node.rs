//! Parsed node tree.

use crate::attrs::AssignOp;
use crate::value::Value;

/// Name of the synthetic node returned by [`parse`](crate::parse).
///
/// `#` is outside the node-name alphabet, so authors can never write a block
/// with this name.
pub const DOCUMENT_ROOT: &str = "#document";

const CLASS: &str = "class";
const CLASS_KEYS: [&str; 2] = [CLASS, "className"];

/// Insertion-ordered attribute map.
///
/// Keys are unique. Re-assigning a key keeps its original position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    entries: Vec<(String, Value)>,
}

impl Attributes {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get an attribute value by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find_map(|(k, v)| (k == key).then_some(v))
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Set `key` to `value`, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Apply an assignment written in markup.
    ///
    /// `+=` on `class` (or its alias `className`) appends to `class` after a
    /// single space. Every other combination overwrites.
    pub fn assign(&mut self, key: &str, op: AssignOp, value: Value) {
        if op == AssignOp::Append && CLASS_KEYS.contains(&key) {
            let joined = match self.get(CLASS) {
                Some(existing) => format!("{existing} {value}"),
                None => value.to_string(),
            };
            self.insert(CLASS, Value::Str(joined.trim().to_owned()));
            return;
        }
        self.insert(key, value);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Attributes {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// One item of a node's ordered content.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(untagged))]
pub enum Child {
    /// Raw text, not yet escaped.
    Text(String),
    Node(Node),
}

/// A named markup element.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Node {
    pub name: String,
    pub attributes: Attributes,
    /// Content in document order.
    pub children: Vec<Child>,
}

impl Node {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Attributes::new(),
            children: Vec::new(),
        }
    }

    /// Builder-style attribute assignment.
    #[must_use]
    pub fn with_attr(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.attributes.insert(key, value.into());
        self
    }

    /// Builder-style child append.
    #[must_use]
    pub fn with_child(mut self, child: impl Into<Child>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Depth-first concatenation of all descendant text.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }

    /// First descendant (pre-order, excluding `self`) named `name`.
    #[must_use]
    pub fn find_first(&self, name: &str) -> Option<&Node> {
        self.children.iter().find_map(|child| match child {
            Child::Node(node) if node.name == name => Some(node),
            Child::Node(node) => node.find_first(name),
            Child::Text(_) => None,
        })
    }

    /// Iterate over direct children that are nodes.
    pub fn child_nodes(&self) -> impl Iterator<Item = &Node> {
        self.children.iter().filter_map(|child| match child {
            Child::Node(node) => Some(node),
            Child::Text(_) => None,
        })
    }
}

fn collect_text(children: &[Child], out: &mut String) {
    for child in children {
        match child {
            Child::Text(text) => out.push_str(text),
            Child::Node(node) => collect_text(&node.children, out),
        }
    }
}

impl From<Node> for Child {
    fn from(node: Node) -> Self {
        Self::Node(node)
    }
}

impl From<&str> for Child {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for Child {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}
