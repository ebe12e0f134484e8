//! Generic node tree.
//!
//! One node type for every tag. Structural meaning (heading, button bar, ...)
//! is carried by tag name and class tokens, never by a Rust subtype.

use std::fmt;

// ---------------------------------------------------------------------------
// Node / Element
// ---------------------------------------------------------------------------

/// A node in the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
    Comment(String),
}

impl Node {
    /// The element, if this node is one.
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Node::Element(el) => Some(el),
            _ => None,
        }
    }
}

impl From<Element> for Node {
    fn from(el: Element) -> Self {
        Node::Element(el)
    }
}

/// An element with ordered attributes and children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Lowercase local tag name.
    pub name: String,
    /// Attributes in source order.
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder-style attribute setter.
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(key, value);
        self
    }

    /// Builder-style text child.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    /// Builder-style element child.
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, replacing an existing value in place.
    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.attrs.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((key, value)),
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.attr("id")
    }

    /// Whether the `class` attribute contains `class` as a whitespace-separated token.
    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .is_some_and(|list| list.split_whitespace().any(|token| token == class))
    }

    pub fn is(&self, tag: &str) -> bool {
        self.name.eq_ignore_ascii_case(tag)
    }

    /// Concatenated text of all descendant text nodes, in document order.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }

    /// Append a child and return its index.
    pub fn append(&mut self, node: impl Into<Node>) -> usize {
        self.children.push(node.into());
        self.children.len() - 1
    }

    /// Child elements, skipping text and comments.
    pub fn element_children(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// Resolve a path relative to this element.
    pub fn get(&self, path: &NodePath) -> Option<&Element> {
        let mut current = self;
        for &index in path.indices() {
            current = current.children.get(index)?.as_element()?;
        }
        Some(current)
    }

    pub fn get_mut(&mut self, path: &NodePath) -> Option<&mut Element> {
        let mut current = self;
        for &index in path.indices() {
            current = current.children.get_mut(index)?.as_element_mut()?;
        }
        Some(current)
    }

    /// Remove and return the node at `path`. The empty path cannot be detached.
    pub fn detach(&mut self, path: &NodePath) -> Option<Node> {
        let (last, parent) = path.split_last()?;
        let parent = self.get_mut(&parent)?;
        if last < parent.children.len() {
            Some(parent.children.remove(last))
        } else {
            None
        }
    }
}

fn collect_text(el: &Element, out: &mut String) {
    for child in &el.children {
        match child {
            Node::Text(text) => out.push_str(text),
            Node::Element(inner) => collect_text(inner, out),
            Node::Comment(_) => {}
        }
    }
}

// ---------------------------------------------------------------------------
// NodePath
// ---------------------------------------------------------------------------

/// Handle to a node: child indices walked from some root element.
///
/// A handle stays valid as long as no sibling before any step on the path is
/// inserted or removed. Appending children never invalidates it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct NodePath(Vec<usize>);

impl NodePath {
    /// The path to the root itself.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn from_indices(indices: Vec<usize>) -> Self {
        Self(indices)
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Path of this node's `index`-th child.
    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }

    /// Concatenate a path that is relative to this one.
    pub fn join(&self, relative: &NodePath) -> Self {
        let mut indices = self.0.clone();
        indices.extend_from_slice(&relative.0);
        Self(indices)
    }

    /// Last index and the parent path, or `None` for the root.
    pub fn split_last(&self) -> Option<(usize, NodePath)> {
        let (last, rest) = self.0.split_last()?;
        Some((*last, NodePath(rest.to_vec())))
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("/");
        }
        for index in &self.0 {
            write!(f, "/{index}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Element {
        Element::new("div")
            .with_attr("id", "outer")
            .with_text("a")
            .with_child(
                Element::new("p")
                    .with_attr("class", "x  tabcontent y")
                    .with_text("b")
                    .with_child(Element::new("em").with_text("c")),
            )
    }

    #[test]
    fn class_tokens_match_whole_words() {
        let el = sample();
        let p = el.get(&NodePath::from_indices(vec![1])).unwrap();
        assert!(p.has_class("tabcontent"));
        assert!(p.has_class("y"));
        assert!(!p.has_class("tab"));
        assert!(!el.has_class("x"));
    }

    #[test]
    fn text_content_is_document_order() {
        assert_eq!(sample().text_content(), "abc");
    }

    #[test]
    fn set_attr_replaces_in_place() {
        let mut el = Element::new("a").with_attr("id", "1").with_attr("href", "#");
        el.set_attr("id", "2");
        assert_eq!(el.attrs[0], ("id".to_string(), "2".to_string()));
        assert_eq!(el.attrs.len(), 2);
    }

    #[test]
    fn get_through_text_node_fails() {
        let el = sample();
        assert!(el.get(&NodePath::from_indices(vec![0])).is_none());
        assert!(el.get(&NodePath::from_indices(vec![1, 1])).is_some());
        assert!(el.get(&NodePath::from_indices(vec![7])).is_none());
    }

    #[test]
    fn detach_removes_subtree() {
        let mut el = sample();
        let taken = el.detach(&NodePath::from_indices(vec![1])).unwrap();
        assert_eq!(taken.as_element().unwrap().name, "p");
        assert_eq!(el.children.len(), 1);
        assert!(el.detach(&NodePath::root()).is_none());
    }

    #[test]
    fn path_display_and_join() {
        let base = NodePath::root().child(1);
        let full = base.join(&NodePath::from_indices(vec![0, 2]));
        assert_eq!(full.to_string(), "/1/0/2");
        assert_eq!(NodePath::root().to_string(), "/");
        assert_eq!(full.split_last().unwrap().0, 2);
    }
}
