//! Locate-or-create for the structural nodes of the output document.
//!
//! Every structural kind is described by one [`KindSpec`] row. The same row is
//! used to detect an existing node and to build a new one, so detection and
//! creation can never disagree.

use std::fmt;

use serde::Serialize;
use tracing::{debug, warn};

use tabpanel_dom::{Document, Element, NodePath, Scope, tag_with_class};
use tabpanel_shared::{MarkersConfig, Result, TabPanelError};

/// The closed set of nodes that occur at most once in the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StructuralKind {
    Heading,
    Style,
    Script,
    ButtonBar,
    ContentContainer,
}

impl StructuralKind {
    pub const ALL: [StructuralKind; 5] = [
        Self::Heading,
        Self::Style,
        Self::Script,
        Self::ButtonBar,
        Self::ContentContainer,
    ];
}

impl fmt::Display for StructuralKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Heading => "heading",
            Self::Style => "style",
            Self::Script => "script",
            Self::ButtonBar => "button bar",
            Self::ContentContainer => "content container",
        };
        f.write_str(name)
    }
}

/// Which top-level region a kind lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Head,
    Body,
}

/// Selector and construction rule for one structural kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindSpec<'a> {
    pub region: Region,
    pub scope: Scope,
    pub tag: &'static str,
    pub class: Option<&'a str>,
}

impl KindSpec<'_> {
    pub fn matches(&self, el: &Element) -> bool {
        tag_with_class(self.tag, self.class)(el)
    }

    /// A fresh, empty node carrying this kind's identifying attributes.
    pub fn create(&self) -> Element {
        let el = Element::new(self.tag);
        match self.class {
            Some(class) => el.with_attr("class", class),
            None => el,
        }
    }
}

/// Result of a locate-or-create call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Located {
    pub path: NodePath,
    /// `true` when the node was built by this call.
    pub created: bool,
    /// Matches beyond the first that were ignored.
    pub ignored_duplicates: usize,
}

/// Finds or builds structural nodes according to the configured markers.
#[derive(Debug, Clone)]
pub struct StructuralLocator<'m> {
    markers: &'m MarkersConfig,
}

impl<'m> StructuralLocator<'m> {
    pub fn new(markers: &'m MarkersConfig) -> Self {
        Self { markers }
    }

    /// The selector table.
    pub fn spec(&self, kind: StructuralKind) -> KindSpec<'m> {
        let (region, scope, tag, class) = match kind {
            StructuralKind::Heading => (Region::Body, Scope::Descendants, "h1", None),
            StructuralKind::Style => (Region::Head, Scope::Children, "style", None),
            StructuralKind::Script => (Region::Head, Scope::Children, "script", None),
            StructuralKind::ButtonBar => (
                Region::Body,
                Scope::Descendants,
                "div",
                Some(self.markers.button_bar_class.as_str()),
            ),
            StructuralKind::ContentContainer => (
                Region::Body,
                Scope::Descendants,
                "div",
                Some(self.markers.content_container_class.as_str()),
            ),
        };
        KindSpec {
            region,
            scope,
            tag,
            class,
        }
    }

    /// Every existing node of `kind`, in document order.
    pub fn find_all(&self, doc: &Document, kind: StructuralKind) -> Vec<NodePath> {
        let spec = self.spec(kind);
        let region = match spec.region {
            Region::Head => doc.head(),
            Region::Body => doc.body(),
        };
        match region {
            Some(region) => doc.find_all(&region, spec.scope, |el| spec.matches(el)),
            None => Vec::new(),
        }
    }

    /// The first existing node of `kind`, if any.
    pub fn locate(&self, doc: &Document, kind: StructuralKind) -> Option<Located> {
        let mut found = self.find_all(doc, kind).into_iter();
        let path = found.next()?;
        let ignored_duplicates = found.count();
        if ignored_duplicates > 0 {
            warn!(
                %kind,
                %path,
                ignored = ignored_duplicates,
                "several existing nodes match; using the first in document order"
            );
        }
        Some(Located {
            path,
            created: false,
            ignored_duplicates,
        })
    }

    /// Return the existing node of `kind`, or append an empty one.
    pub fn locate_or_create(&self, doc: &mut Document, kind: StructuralKind) -> Result<Located> {
        self.locate_or_try_create(doc, kind, |_| Ok(()))
    }

    /// Like [`locate_or_create`](Self::locate_or_create), but `fill` populates a
    /// node before it is attached. `fill` runs only when nothing was found, and
    /// its error leaves the document untouched.
    pub fn locate_or_try_create<F>(
        &self,
        doc: &mut Document,
        kind: StructuralKind,
        fill: F,
    ) -> Result<Located>
    where
        F: FnOnce(&mut Element) -> Result<()>,
    {
        if let Some(found) = self.locate(doc, kind) {
            debug!(%kind, path = %found.path, "structural node already present");
            return Ok(found);
        }

        let spec = self.spec(kind);
        let mut node = spec.create();
        fill(&mut node)?;

        let regions = doc.ensure_regions();
        let parent = match spec.region {
            Region::Head => regions.head,
            Region::Body => regions.body,
        };
        let path = doc
            .append(&parent, node)
            .ok_or_else(|| TabPanelError::invalid_handle(&parent))?;
        debug!(%kind, %path, "created structural node");

        Ok(Located {
            path,
            created: true,
            ignored_duplicates: 0,
        })
    }
}
