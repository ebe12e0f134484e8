//! What an assembly run did, and what it had to degrade.

use std::fmt;

use serde::Serialize;

use crate::locator::StructuralKind;

/// Why a fragment (or the document) was degraded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum DiagnosticKind {
    /// The fragment text could not be turned into a tree.
    ParseFailed { message: String },
    /// No title attribute, title element, or identifier.
    MissingTitle,
    /// A label was found but no identifier to target.
    MissingIdentifier,
    /// No node carries the content class; fragment dropped.
    MissingContent,
    /// No node carries the content class; the button was kept anyway.
    OrphanedButton { target: String },
    /// The identifier is already used in the document; fragment dropped.
    DuplicateIdentifier { id: String },
    /// Several nodes of one structural kind; the first one is used.
    DuplicateStructural { node: StructuralKind, count: usize },
    /// An asset exists but was unreadable; its node is empty.
    AssetUnreadable { asset: String, message: String },
}

/// One recorded degradation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// The fragment concerned; `None` for document-level findings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fragment: Option<String>,
    #[serde(flatten)]
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    pub fn fragment(name: impl Into<String>, kind: DiagnosticKind) -> Self {
        Self {
            fragment: Some(name.into()),
            kind,
        }
    }

    pub fn document(kind: DiagnosticKind) -> Self {
        Self {
            fragment: None,
            kind,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.fragment {
            write!(f, "{name}: ")?;
        }
        match &self.kind {
            DiagnosticKind::ParseFailed { message } => write!(f, "not parsed ({message})"),
            DiagnosticKind::MissingTitle => f.write_str("no title or identifier; skipped"),
            DiagnosticKind::MissingIdentifier => f.write_str("no identifier; skipped"),
            DiagnosticKind::MissingContent => f.write_str("no content node; skipped"),
            DiagnosticKind::OrphanedButton { target } => {
                write!(f, "no content node; button for '{target}' targets nothing")
            }
            DiagnosticKind::DuplicateIdentifier { id } => {
                write!(f, "identifier '{id}' already in use; skipped")
            }
            DiagnosticKind::DuplicateStructural { node, count } => {
                write!(f, "{count} {node} nodes found; using the first")
            }
            DiagnosticKind::AssetUnreadable { asset, message } => {
                write!(f, "asset {asset} unreadable ({message}); injected empty")
            }
        }
    }
}

/// A tab added by this run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TabSummary {
    pub label: String,
    pub target: String,
    /// `false` for an orphaned button.
    pub has_content: bool,
}

/// Outcome of one assembly run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AssemblyReport {
    /// Whether this run created the heading (and so used its title).
    pub heading_created: bool,
    /// Tabs added by this run, in input order.
    pub tabs: Vec<TabSummary>,
    /// Degradations and warnings, in the order they were found.
    pub diagnostics: Vec<Diagnostic>,
}

impl AssemblyReport {
    pub fn button_count(&self) -> usize {
        self.tabs.len()
    }

    pub fn content_count(&self) -> usize {
        self.tabs.iter().filter(|t| t.has_content).count()
    }

    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub(crate) fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostics_serialize_flat_with_kind_tag() {
        let d = Diagnostic::fragment(
            "t2.html",
            DiagnosticKind::DuplicateIdentifier { id: "t2".into() },
        );
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json["kind"], "duplicate-identifier");
        assert_eq!(json["fragment"], "t2.html");
        assert_eq!(json["id"], "t2");

        let doc_level = Diagnostic::document(DiagnosticKind::DuplicateStructural {
            node: StructuralKind::ButtonBar,
            count: 2,
        });
        let json = serde_json::to_value(&doc_level).unwrap();
        assert!(json.get("fragment").is_none());
        assert_eq!(json["node"], "button-bar");
    }

    #[test]
    fn display_is_one_line() {
        let d = Diagnostic::fragment("a.html", DiagnosticKind::MissingContent);
        assert_eq!(d.to_string(), "a.html: no content node; skipped");
        let d = Diagnostic::document(DiagnosticKind::DuplicateStructural {
            node: StructuralKind::Heading,
            count: 3,
        });
        assert_eq!(d.to_string(), "3 heading nodes found; using the first");
    }

    #[test]
    fn counts_distinguish_orphans() {
        let report = AssemblyReport {
            heading_created: true,
            tabs: vec![
                TabSummary {
                    label: "A".into(),
                    target: "a".into(),
                    has_content: true,
                },
                TabSummary {
                    label: "B".into(),
                    target: "b".into(),
                    has_content: false,
                },
            ],
            diagnostics: Vec::new(),
        };
        assert_eq!(report.button_count(), 2);
        assert_eq!(report.content_count(), 1);
        assert!(report.is_clean());
    }
}
