//! Input fragments: one parsed tree per tab.

use tabpanel_dom::{Element, Node, NodePath, Scope, find_first, parse_fragment_root};
use tabpanel_shared::{Result, TabPanelError};

/// Raw fragment text plus a label for diagnostics (usually the file path).
#[derive(Debug, Clone)]
pub struct FragmentSource {
    pub name: String,
    pub html: String,
}

/// One parsed fragment.
#[derive(Debug, Clone)]
pub struct Fragment {
    /// Where the fragment came from; used only in diagnostics.
    pub name: String,
    pub root: Element,
}

impl Fragment {
    pub fn new(name: impl Into<String>, root: Element) -> Self {
        Self {
            name: name.into(),
            root,
        }
    }

    /// Parse fragment text. Fails when the text holds no element.
    pub fn parse(name: impl Into<String>, html: &str) -> Result<Self> {
        let name = name.into();
        let root = parse_fragment_root(html)
            .ok_or_else(|| TabPanelError::parse(format!("{name}: no element found")))?;
        Ok(Self { name, root })
    }

    /// Handle (relative to the root) of the first node carrying `content_class`,
    /// the root itself included.
    pub fn content_path(&self, content_class: &str) -> Option<NodePath> {
        find_first(&self.root, Scope::SelfAndDescendants, |el| {
            el.has_class(content_class)
        })
    }

    /// The identifier: the root's `id`, else the content node's `id`.
    pub fn identifier(&self, content_class: &str) -> Option<&str> {
        if let Some(id) = self.root.id().map(str::trim).filter(|id| !id.is_empty()) {
            return Some(id);
        }
        let path = self.content_path(content_class)?;
        self.root
            .get(&path)
            .and_then(Element::id)
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }

    /// Consume the fragment, keeping only the node at `path`.
    pub fn into_content(mut self, path: &NodePath) -> Option<Element> {
        if path.is_root() {
            return Some(self.root);
        }
        match self.root.detach(path)? {
            Node::Element(el) => Some(el),
            _ => None,
        }
    }
}
