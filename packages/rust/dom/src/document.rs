//! The output document: an `html` root with a head and a body region.

use crate::node::{Element, Node, NodePath};
use crate::search::{self, Scope};

/// Handles to the two top-level regions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Regions {
    pub head: NodePath,
    pub body: NodePath,
}

/// A whole HTML document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    root: Element,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Empty `<html><head></head><body></body></html>`.
    pub fn new() -> Self {
        Self {
            root: Element::new("html")
                .with_child(Element::new("head"))
                .with_child(Element::new("body")),
        }
    }

    /// Adopt an existing tree. A non-`html` root is placed inside a fresh body.
    pub fn from_root(root: Element) -> Self {
        if root.is("html") {
            return Self { root };
        }
        let mut doc = Self::new();
        doc.root.children[1] = Node::Element(Element::new("body").with_child(root));
        doc
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn into_root(self) -> Element {
        self.root
    }

    pub fn get(&self, path: &NodePath) -> Option<&Element> {
        self.root.get(path)
    }

    pub fn head(&self) -> Option<NodePath> {
        search::find_first(&self.root, Scope::Children, |el| el.is("head"))
    }

    pub fn body(&self) -> Option<NodePath> {
        search::find_first(&self.root, Scope::Children, |el| el.is("body"))
    }

    /// Make sure head and body exist and return handles to both.
    ///
    /// A missing head is inserted as the first child of `html`, which shifts
    /// sibling indices: call this before taking any other handle.
    pub fn ensure_regions(&mut self) -> Regions {
        if self.head().is_none() {
            self.root.children.insert(0, Node::Element(Element::new("head")));
        }
        if self.body().is_none() {
            self.root.append(Element::new("body"));
        }
        Regions {
            head: self.head().unwrap_or_default(),
            body: self.body().unwrap_or_default(),
        }
    }

    /// Append `node` under `parent`, returning the new child's handle.
    pub fn append(&mut self, parent: &NodePath, node: impl Into<Node>) -> Option<NodePath> {
        let index = self.root.get_mut(parent)?.append(node);
        Some(parent.child(index))
    }

    /// First match under `from`, as an absolute handle.
    pub fn find_first<F>(&self, from: &NodePath, scope: Scope, pred: F) -> Option<NodePath>
    where
        F: Fn(&Element) -> bool,
    {
        let start = self.root.get(from)?;
        search::find_first(start, scope, pred).map(|rel| from.join(&rel))
    }

    /// Every match under `from`, as absolute handles in document order.
    pub fn find_all<F>(&self, from: &NodePath, scope: Scope, pred: F) -> Vec<NodePath>
    where
        F: Fn(&Element) -> bool,
    {
        match self.root.get(from) {
            Some(start) => search::find_all(start, scope, pred)
                .into_iter()
                .map(|rel| from.join(&rel))
                .collect(),
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_document_has_both_regions() {
        let doc = Document::new();
        assert_eq!(doc.head(), Some(NodePath::from_indices(vec![0])));
        assert_eq!(doc.body(), Some(NodePath::from_indices(vec![1])));
    }

    #[test]
    fn ensure_regions_repairs_headless_document() {
        let mut doc = Document::from_root(
            Element::new("html").with_child(Element::new("body").with_text("x")),
        );
        let regions = doc.ensure_regions();
        assert_eq!(doc.get(&regions.head).unwrap().name, "head");
        assert_eq!(doc.get(&regions.body).unwrap().text_content(), "x");

        let again = doc.ensure_regions();
        assert_eq!(regions, again);
        assert_eq!(doc.root().children.len(), 2);
    }

    #[test]
    fn from_root_wraps_bare_element() {
        let doc = Document::from_root(Element::new("div").with_attr("id", "t1"));
        let body = doc.body().unwrap();
        let div = doc.find_first(&body, Scope::Children, |el| el.is("div")).unwrap();
        assert_eq!(doc.get(&div).unwrap().id(), Some("t1"));
    }

    #[test]
    fn append_returns_resolvable_handle() {
        let mut doc = Document::new();
        let body = doc.body().unwrap();
        let first = doc.append(&body, Element::new("h1")).unwrap();
        let second = doc.append(&body, Element::new("div")).unwrap();
        assert_eq!(doc.get(&first).unwrap().name, "h1");
        assert_eq!(doc.get(&second).unwrap().name, "div");
        assert!(doc.append(&NodePath::from_indices(vec![9]), Element::new("p")).is_none());
    }
}
