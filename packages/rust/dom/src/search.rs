//! Depth-first, pre-order search over the node tree.
//!
//! Every lookup in tabpanel goes through [`find_first`] / [`find_all`] with a
//! plain predicate. "First" always means first in document order.

use crate::node::{Element, Node, NodePath};

/// How far below the search root to look.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Direct child elements only.
    Children,
    /// Any descendant element, root excluded.
    Descendants,
    /// The root itself, then any descendant.
    SelfAndDescendants,
}

/// Path (relative to `root`) of the first element matching `pred`.
pub fn find_first<F>(root: &Element, scope: Scope, pred: F) -> Option<NodePath>
where
    F: Fn(&Element) -> bool,
{
    let mut found = Vec::new();
    search(root, scope, &pred, true, &mut found);
    found.into_iter().next()
}

/// Paths (relative to `root`) of every element matching `pred`, in document order.
pub fn find_all<F>(root: &Element, scope: Scope, pred: F) -> Vec<NodePath>
where
    F: Fn(&Element) -> bool,
{
    let mut found = Vec::new();
    search(root, scope, &pred, false, &mut found);
    found
}

/// Predicate: tag name and, optionally, a required class token.
pub fn tag_with_class<'a>(tag: &'a str, class: Option<&'a str>) -> impl Fn(&Element) -> bool + 'a {
    move |el: &Element| el.is(tag) && class.is_none_or(|c| el.has_class(c))
}

fn search(
    root: &Element,
    scope: Scope,
    pred: &dyn Fn(&Element) -> bool,
    first_only: bool,
    found: &mut Vec<NodePath>,
) {
    if scope == Scope::SelfAndDescendants && pred(root) {
        found.push(NodePath::root());
        if first_only {
            return;
        }
    }
    let max_depth = match scope {
        Scope::Children => Some(1),
        Scope::Descendants | Scope::SelfAndDescendants => None,
    };
    let mut path = Vec::new();
    walk(root, &mut path, max_depth, pred, first_only, found);
}

/// Returns `true` once the search can stop.
fn walk(
    el: &Element,
    path: &mut Vec<usize>,
    max_depth: Option<usize>,
    pred: &dyn Fn(&Element) -> bool,
    first_only: bool,
    found: &mut Vec<NodePath>,
) -> bool {
    for (index, child) in el.children.iter().enumerate() {
        let Node::Element(child) = child else {
            continue;
        };
        path.push(index);
        if pred(child) {
            found.push(NodePath::from_indices(path.clone()));
            if first_only {
                return true;
            }
        }
        let descend = max_depth.is_none_or(|max| path.len() < max);
        if descend && walk(child, path, max_depth, pred, first_only, found) {
            return true;
        }
        path.pop();
    }
    false
}
