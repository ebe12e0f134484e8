//! Tabbed document assembler.
//!
//! Takes an ordered list of fragments and merges them into one document:
//! a heading, the style and script assets, a bar with one button per
//! fragment, and a container holding each fragment's content node.
//!
//! ```text
//! <html>
//! ├── <head>
//! │   ├── <style>   (tabButton.css)
//! │   └── <script>  (tabButton.js)
//! └── <body>
//!     ├── <h1>title</h1>
//!     ├── <div class="tab">
//!     │   ├── <button data-target="t1" …>Table 1</button>
//!     │   └── <button data-target="t2" …>Table 2</button>
//!     └── <div class="tabcontentdiv">
//!         ├── <div id="t1" class="tabcontent">…</div>
//!         └── <div id="t2" class="tabcontent">…</div>
//! ```
//!
//! Assembling into a document that already has some of these nodes reuses
//! them, so a document can be extended by several runs.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use tabpanel_dom::{Document, Element, Node, NodePath, Scope, find_all};
use tabpanel_shared::{AssembleOptions, OrphanPolicy, Result, TabPanelError};

use crate::assets::{AssetCache, AssetInjector, BuiltinAssets, Injection};
use crate::button::{TabButton, TabButtonFactory};
use crate::fragment::{Fragment, FragmentSource};
use crate::locator::{StructuralKind, StructuralLocator};
use crate::report::{AssemblyReport, Diagnostic, DiagnosticKind, TabSummary};
use crate::title::TitleResolver;

/// Merges fragments into a tabbed document.
#[derive(Debug, Clone)]
pub struct DocumentAssembler {
    options: AssembleOptions,
    cache: Arc<AssetCache>,
}

/// Per-run state shared by every fragment.
struct Run<'a> {
    options: &'a AssembleOptions,
    resolver: TitleResolver<'a>,
    factory: TabButtonFactory<'a>,
    button_bar: NodePath,
    container: NodePath,
    seen_ids: HashSet<String>,
}

impl DocumentAssembler {
    pub fn new(options: AssembleOptions, cache: Arc<AssetCache>) -> Self {
        Self { options, cache }
    }

    /// Assembler over the built-in assets, styled for `options.markers`, with a
    /// private cache.
    pub fn with_builtin_assets(options: AssembleOptions) -> Self {
        let cache = AssetCache::new(BuiltinAssets::for_markers(&options.markers));
        Self::new(options, Arc::new(cache))
    }

    /// Assemble into a fresh document.
    pub fn assemble_new(
        &self,
        title: &str,
        fragments: Vec<Fragment>,
    ) -> Result<(Document, AssemblyReport)> {
        let mut doc = Document::new();
        let report = self.assemble(&mut doc, title, fragments)?;
        Ok((doc, report))
    }

    /// Parse each source, then assemble. Unparseable sources are reported
    /// and skipped.
    pub fn assemble_sources(
        &self,
        doc: &mut Document,
        title: &str,
        sources: &[FragmentSource],
    ) -> Result<AssemblyReport> {
        let mut parse_failures = Vec::new();
        let mut fragments = Vec::with_capacity(sources.len());
        for source in sources {
            match Fragment::parse(&source.name, &source.html) {
                Ok(fragment) => fragments.push(fragment),
                Err(e) => {
                    warn!(fragment = %source.name, error = %e, "fragment not parsed; skipped");
                    parse_failures.push(Diagnostic::fragment(
                        &source.name,
                        DiagnosticKind::ParseFailed {
                            message: e.to_string(),
                        },
                    ));
                }
            }
        }

        let mut report = self.assemble(doc, title, fragments)?;
        report.diagnostics.splice(0..0, parse_failures);
        Ok(report)
    }

    /// Merge `fragments`, in order, into `doc`.
    ///
    /// Only a missing asset is fatal. Every per-fragment problem degrades
    /// that fragment, is logged, and is recorded in the returned report.
    #[instrument(skip_all, fields(title = %title, fragments = fragments.len()))]
    pub fn assemble(
        &self,
        doc: &mut Document,
        title: &str,
        fragments: Vec<Fragment>,
    ) -> Result<AssemblyReport> {
        let markers = &self.options.markers;
        let locator = StructuralLocator::new(markers);
        let mut report = AssemblyReport::default();

        doc.ensure_regions();

        // Heading: an existing one wins over `title`
        let heading = locator.locate_or_try_create(doc, StructuralKind::Heading, |h1| {
            h1.append(Node::Text(title.to_string()));
            Ok(())
        })?;
        report.heading_created = heading.created;
        if !heading.created {
            debug!("existing heading kept; title argument ignored");
        }

        // Assets
        let injector = AssetInjector::new(&self.cache, &locator);
        let injections = [
            (
                self.options.style_asset.as_str(),
                injector.ensure_style(doc, &self.options.style_asset)?,
            ),
            (
                self.options.script_asset.as_str(),
                injector.ensure_script(doc, &self.options.script_asset)?,
            ),
        ];
        for (asset, injection) in injections {
            if let Injection::InjectedEmpty { message, .. } = injection {
                report.push(Diagnostic::document(DiagnosticKind::AssetUnreadable {
                    asset: asset.to_string(),
                    message,
                }));
            }
        }

        // Containers
        let button_bar = locator.locate_or_create(doc, StructuralKind::ButtonBar)?.path;
        let container = locator.locate_or_create(doc, StructuralKind::ContentContainer)?.path;

        let mut run = Run {
            options: &self.options,
            resolver: TitleResolver::new(&markers.content_class),
            factory: TabButtonFactory::new(&markers.button_class, &markers.content_class),
            button_bar,
            container,
            seen_ids: existing_ids(doc),
        };

        for fragment in fragments {
            run.add(doc, fragment, &mut report)?;
        }

        // Counted after the fragments: content may carry structural markup too
        for kind in StructuralKind::ALL {
            let count = locator.find_all(doc, kind).len();
            if count > 1 {
                warn!(%kind, count, "structural node occurs more than once");
                report.push(Diagnostic::document(DiagnosticKind::DuplicateStructural {
                    node: kind,
                    count,
                }));
            }
        }

        info!(
            buttons = report.button_count(),
            content_blocks = report.content_count(),
            diagnostics = report.diagnostics.len(),
            "assembly complete"
        );

        Ok(report)
    }
}

impl Run<'_> {
    fn add(
        &mut self,
        doc: &mut Document,
        fragment: Fragment,
        report: &mut AssemblyReport,
    ) -> Result<()> {
        let name = fragment.name.clone();
        let content_class = self.options.markers.content_class.as_str();

        let label = match self.resolver.resolve(&fragment) {
            Ok(label) => label,
            Err(e) => {
                warn!(fragment = %name, error = %e, "fragment skipped");
                report.push(Diagnostic::fragment(name, DiagnosticKind::MissingTitle));
                return Ok(());
            }
        };

        let Some(id) = fragment.identifier(content_class).map(str::to_string) else {
            warn!(fragment = %name, %label, "fragment has no identifier; skipped");
            report.push(Diagnostic::fragment(name, DiagnosticKind::MissingIdentifier));
            return Ok(());
        };

        if self.seen_ids.contains(&id) {
            warn!(fragment = %name, %id, "identifier already in use; fragment skipped");
            report.push(Diagnostic::fragment(
                name,
                DiagnosticKind::DuplicateIdentifier { id },
            ));
            return Ok(());
        }

        let Some(content_path) = fragment.content_path(content_class) else {
            return self.add_orphan(doc, name, id, label, report);
        };

        let mut content = fragment
            .into_content(&content_path)
            .ok_or_else(|| TabPanelError::invalid_handle(&content_path))?;
        if content.id() != Some(id.as_str()) {
            debug!(
                fragment = %name,
                old = ?content.id(),
                new = %id,
                "content node takes fragment identifier"
            );
            content.set_attr("id", id.as_str());
        }

        claim_ids(&content, &mut self.seen_ids);
        let button = self.factory.build(&id, &label);
        append(doc, &self.button_bar, button)?;
        append(doc, &self.container, content)?;
        debug!(fragment = %name, %id, %label, "tab added");

        report.tabs.push(TabSummary {
            label,
            target: id,
            has_content: true,
        });
        Ok(())
    }

    fn add_orphan(
        &mut self,
        doc: &mut Document,
        name: String,
        id: String,
        label: String,
        report: &mut AssemblyReport,
    ) -> Result<()> {
        match self.options.orphan_policy {
            OrphanPolicy::Skip => {
                warn!(fragment = %name, %id, "no content node; fragment skipped");
                report.push(Diagnostic::fragment(name, DiagnosticKind::MissingContent));
            }
            OrphanPolicy::Keep => {
                warn!(fragment = %name, %id, "no content node; button kept without content");
                append(doc, &self.button_bar, self.factory.build(&id, &label))?;
                self.seen_ids.insert(id.clone());
                report.push(Diagnostic::fragment(
                    name,
                    DiagnosticKind::OrphanedButton { target: id.clone() },
                ));
                report.tabs.push(TabSummary {
                    label,
                    target: id,
                    has_content: false,
                });
            }
        }
        Ok(())
    }
}

fn append(doc: &mut Document, parent: &NodePath, node: impl Into<Element>) -> Result<()> {
    let element: Element = node.into();
    doc.append(parent, element)
        .map(|_| ())
        .ok_or_else(|| TabPanelError::invalid_handle(parent))
}

/// Every identifier the document already claims.
fn existing_ids(doc: &Document) -> HashSet<String> {
    let mut ids = HashSet::new();
    claim_ids(doc.root(), &mut ids);
    ids
}

/// Adds each `id` and each button target found in `root`'s subtree, root
/// included. Used both for the starting document and for every content block
/// a run appends, so one run and several runs reject the same fragments.
fn claim_ids(root: &Element, ids: &mut HashSet<String>) {
    for path in find_all(root, Scope::SelfAndDescendants, |_| true) {
        let Some(el) = root.get(&path) else {
            continue;
        };
        if let Some(id) = el.id().map(str::trim).filter(|id| !id.is_empty()) {
            ids.insert(id.to_string());
        }
        if let Some(button) = TabButton::from_element(el) {
            ids.insert(button.target);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
