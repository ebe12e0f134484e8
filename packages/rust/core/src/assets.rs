//! Style/script assets: loading, caching, and injection into the head.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, LazyLock, Mutex, PoisonError};

use regex::{Captures, Regex};
use tracing::{debug, warn};

use tabpanel_dom::{Document, Node, NodePath};
use tabpanel_shared::{AssetKind, MarkersConfig, Result, TabPanelError};

use crate::locator::{StructuralKind, StructuralLocator};

// ---------------------------------------------------------------------------
// Loaders
// ---------------------------------------------------------------------------

/// Resolves an asset name to its text.
///
/// Implementations return [`TabPanelError::AssetNotFound`] when the name does
/// not exist and [`TabPanelError::AssetUnreadable`] when it exists but its text
/// cannot be obtained.
pub trait AssetLoader: Send + Sync {
    fn load(&self, name: &str) -> Result<String>;
}

/// Assets compiled into the binary.
///
/// The stylesheet is written against the default marker classes; class
/// selectors naming a default marker are renamed to the configured one on load.
/// The script needs no rewriting: buttons carry their content class.
#[derive(Debug, Clone, Default)]
pub struct BuiltinAssets {
    markers: MarkersConfig,
}

impl BuiltinAssets {
    pub const STYLE_NAME: &'static str = "tabButton.css";
    pub const SCRIPT_NAME: &'static str = "tabButton.js";

    const STYLE: &'static str = include_str!("../assets/tabButton.css");
    const SCRIPT: &'static str = include_str!("../assets/tabButton.js");

    /// Built-in assets styled for `markers`.
    pub fn for_markers(markers: &MarkersConfig) -> Self {
        Self {
            markers: markers.clone(),
        }
    }

    fn style(&self) -> String {
        static CLASS_SELECTOR: LazyLock<Regex> =
            LazyLock::new(|| Regex::new(r"\.([A-Za-z_][\w-]*)").expect("valid regex"));

        let defaults = MarkersConfig::default();
        let renames = [
            (&defaults.button_bar_class, &self.markers.button_bar_class),
            (&defaults.content_container_class, &self.markers.content_container_class),
            (&defaults.content_class, &self.markers.content_class),
            (&defaults.button_class, &self.markers.button_class),
        ];
        CLASS_SELECTOR
            .replace_all(Self::STYLE, |caps: &Captures| {
                let class = &caps[1];
                let renamed = renames
                    .iter()
                    .find(|(default, _)| default.as_str() == class)
                    .map_or(class, |(_, configured)| configured.as_str());
                format!(".{renamed}")
            })
            .into_owned()
    }
}

impl AssetLoader for BuiltinAssets {
    fn load(&self, name: &str) -> Result<String> {
        match name {
            Self::STYLE_NAME => Ok(self.style()),
            Self::SCRIPT_NAME => Ok(Self::SCRIPT.to_string()),
            _ => Err(TabPanelError::AssetNotFound {
                name: name.to_string(),
            }),
        }
    }
}

/// Assets read from a directory on disk.
#[derive(Debug, Clone)]
pub struct DirAssets {
    root: PathBuf,
}

impl DirAssets {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Names are plain relative paths; anything escaping `root` does not exist.
    fn resolve(&self, name: &str) -> Option<PathBuf> {
        let relative = Path::new(name);
        let plain = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        (plain && !name.is_empty()).then(|| self.root.join(relative))
    }
}

impl AssetLoader for DirAssets {
    fn load(&self, name: &str) -> Result<String> {
        let not_found = || TabPanelError::AssetNotFound {
            name: name.to_string(),
        };
        let path = self.resolve(name).ok_or_else(not_found)?;
        if !path.exists() {
            return Err(not_found());
        }
        std::fs::read_to_string(&path).map_err(|e| TabPanelError::AssetUnreadable {
            name: name.to_string(),
            message: format!("{}: {e}", path.display()),
        })
    }
}

// ---------------------------------------------------------------------------
// Cache
// ---------------------------------------------------------------------------

#[derive(Default)]
struct CacheState {
    entries: HashMap<String, Arc<str>>,
    loads: usize,
}

/// Memoizes asset text per name. Only successful loads are kept.
///
/// Share one cache across assemblies to read each asset once per process, or
/// create one per run for isolation.
pub struct AssetCache {
    loader: Box<dyn AssetLoader>,
    state: Mutex<CacheState>,
}

impl AssetCache {
    pub fn new(loader: impl AssetLoader + 'static) -> Self {
        Self {
            loader: Box::new(loader),
            state: Mutex::new(CacheState::default()),
        }
    }

    /// Cache over [`BuiltinAssets`] with the default markers.
    pub fn builtin() -> Self {
        Self::new(BuiltinAssets::default())
    }

    pub fn get(&self, name: &str) -> Result<Arc<str>> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(text) = state.entries.get(name) {
            return Ok(Arc::clone(text));
        }
        state.loads += 1;
        let text: Arc<str> = Arc::from(self.loader.load(name)?);
        debug!(asset = name, bytes = text.len(), "asset loaded");
        state.entries.insert(name.to_string(), Arc::clone(&text));
        Ok(text)
    }

    /// How many times the underlying loader has been asked.
    pub fn load_count(&self) -> usize {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .loads
    }
}

impl std::fmt::Debug for AssetCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetCache")
            .field("loads", &self.load_count())
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Injector
// ---------------------------------------------------------------------------

/// What an ensure call did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Injection {
    /// A node of this kind was already in the head; nothing was loaded.
    AlreadyPresent { path: NodePath },
    /// A new node holding the asset text was attached.
    Injected { path: NodePath },
    /// The asset exists but was unreadable; an empty node was attached.
    InjectedEmpty { path: NodePath, message: String },
}

impl Injection {
    pub fn path(&self) -> &NodePath {
        match self {
            Self::AlreadyPresent { path }
            | Self::Injected { path }
            | Self::InjectedEmpty { path, .. } => path,
        }
    }
}

/// Puts the style and script nodes into a document at most once each.
#[derive(Debug)]
pub struct AssetInjector<'a> {
    cache: &'a AssetCache,
    locator: &'a StructuralLocator<'a>,
}

impl<'a> AssetInjector<'a> {
    pub fn new(cache: &'a AssetCache, locator: &'a StructuralLocator<'a>) -> Self {
        Self { cache, locator }
    }

    pub fn ensure_style(&self, doc: &mut Document, name: &str) -> Result<Injection> {
        self.ensure(doc, AssetKind::Style, name)
    }

    pub fn ensure_script(&self, doc: &mut Document, name: &str) -> Result<Injection> {
        self.ensure(doc, AssetKind::Script, name)
    }

    fn ensure(&self, doc: &mut Document, kind: AssetKind, name: &str) -> Result<Injection> {
        let structural = match kind {
            AssetKind::Style => StructuralKind::Style,
            AssetKind::Script => StructuralKind::Script,
        };

        let mut unreadable = None;
        let located = self.locator.locate_or_try_create(doc, structural, |node| {
            match self.cache.get(name) {
                Ok(text) => {
                    node.append(Node::Text(text.to_string()));
                    Ok(())
                }
                Err(TabPanelError::AssetUnreadable { message, .. }) => {
                    warn!(
                        asset = name,
                        tag = kind.tag(),
                        %message,
                        "asset unreadable; injecting empty node"
                    );
                    unreadable = Some(message);
                    Ok(())
                }
                Err(e) => Err(e),
            }
        })?;

        Ok(match (located.created, unreadable) {
            (false, _) => Injection::AlreadyPresent {
                path: located.path,
            },
            (true, None) => Injection::Injected {
                path: located.path,
            },
            (true, Some(message)) => Injection::InjectedEmpty {
                path: located.path,
                message,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabpanel_dom::parse_document;
    use tabpanel_shared::MarkersConfig;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("tp-assets-test-{}", uuid::Uuid::now_v7()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    /// Loader that fails in a fixed way for every name.
    struct Failing(fn(&str) -> TabPanelError);

    impl AssetLoader for Failing {
        fn load(&self, name: &str) -> Result<String> {
            Err((self.0)(name))
        }
    }

    #[test]
    fn builtin_assets_define_open_tab() {
        let assets = BuiltinAssets::default();
        let script = assets.load(BuiltinAssets::SCRIPT_NAME).unwrap();
        assert!(script.contains("function openTab(evt, tabId, contentClass)"));
        let style = assets.load(BuiltinAssets::STYLE_NAME).unwrap();
        assert_eq!(style, BuiltinAssets::STYLE);
        assert!(matches!(
            assets.load("nope.css"),
            Err(TabPanelError::AssetNotFound { .. })
        ));
    }

    #[test]
    fn builtin_style_follows_custom_markers() {
        let markers = MarkersConfig {
            button_bar_class: "tabbar".into(),
            content_class: "panel".into(),
            ..MarkersConfig::default()
        };
        let style = BuiltinAssets::for_markers(&markers)
            .load(BuiltinAssets::STYLE_NAME)
            .unwrap();

        assert!(style.contains(".tabbar button.active"));
        assert!(style.contains(".panel {"));
        assert!(!style.contains(".tab "));
        assert!(!style.contains(".tabcontent"));
        assert!(style.contains("transition: 0.3s"));
    }

    #[test]
    fn dir_assets_distinguish_missing_from_unreadable() {
        let dir = temp_dir();
        std::fs::write(dir.join("ok.css"), "p { color: red; }").unwrap();
        std::fs::write(dir.join("bad.js"), [0xff, 0xfe, 0x00]).unwrap();
        std::fs::create_dir_all(dir.join("folder.css")).unwrap();
        let loader = DirAssets::new(&dir);

        assert_eq!(loader.load("ok.css").unwrap(), "p { color: red; }");
        assert!(matches!(
            loader.load("missing.css"),
            Err(TabPanelError::AssetNotFound { .. })
        ));
        assert!(matches!(
            loader.load("bad.js"),
            Err(TabPanelError::AssetUnreadable { .. })
        ));
        assert!(matches!(
            loader.load("folder.css"),
            Err(TabPanelError::AssetUnreadable { .. })
        ));
        assert!(matches!(
            loader.load("../ok.css"),
            Err(TabPanelError::AssetNotFound { .. })
        ));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn cache_loads_each_name_once() {
        let cache = AssetCache::builtin();
        let a = cache.get(BuiltinAssets::STYLE_NAME).unwrap();
        let b = cache.get(BuiltinAssets::STYLE_NAME).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.load_count(), 1);
    }

    #[test]
    fn cache_does_not_keep_failures() {
        let cache = AssetCache::builtin();
        assert!(cache.get("nope.js").is_err());
        assert!(cache.get("nope.js").is_err());
        assert_eq!(cache.load_count(), 2);
    }

    #[test]
    fn injects_once_and_skips_loading_when_present() {
        let markers = MarkersConfig::default();
        let locator = StructuralLocator::new(&markers);
        let cache = AssetCache::builtin();
        let injector = AssetInjector::new(&cache, &locator);
        let mut doc = Document::new();

        let first = injector.ensure_script(&mut doc, BuiltinAssets::SCRIPT_NAME).unwrap();
        assert!(matches!(first, Injection::Injected { .. }));
        let text = doc.get(first.path()).unwrap().text_content();
        assert!(text.contains("openTab"));

        let second = injector.ensure_script(&mut doc, BuiltinAssets::SCRIPT_NAME).unwrap();
        assert!(matches!(second, Injection::AlreadyPresent { .. }));
        assert_eq!(locator.find_all(&doc, StructuralKind::Script).len(), 1);
        assert_eq!(cache.load_count(), 1);
    }

    #[test]
    fn existing_style_means_no_load_at_all() {
        let markers = MarkersConfig::default();
        let locator = StructuralLocator::new(&markers);
        let cache = AssetCache::new(Failing(|name| TabPanelError::AssetNotFound {
            name: name.to_string(),
        }));
        let injector = AssetInjector::new(&cache, &locator);
        let mut doc = parse_document("<html><head><style>p{}</style></head><body></body></html>");

        let outcome = injector.ensure_style(&mut doc, "anything.css").unwrap();
        assert!(matches!(outcome, Injection::AlreadyPresent { .. }));
        assert_eq!(cache.load_count(), 0);
    }

    #[test]
    fn missing_asset_is_fatal() {
        let markers = MarkersConfig::default();
        let locator = StructuralLocator::new(&markers);
        let cache = AssetCache::builtin();
        let injector = AssetInjector::new(&cache, &locator);
        let mut doc = Document::new();

        let err = injector.ensure_style(&mut doc, "missing.css").unwrap_err();
        assert!(matches!(err, TabPanelError::AssetNotFound { ref name } if name == "missing.css"));
        assert!(locator.find_all(&doc, StructuralKind::Style).is_empty());
    }

    #[test]
    fn unreadable_asset_injects_empty_node() {
        let markers = MarkersConfig::default();
        let locator = StructuralLocator::new(&markers);
        let cache = AssetCache::new(Failing(|name| TabPanelError::AssetUnreadable {
            name: name.to_string(),
            message: "stream closed".into(),
        }));
        let injector = AssetInjector::new(&cache, &locator);
        let mut doc = Document::new();

        let outcome = injector.ensure_style(&mut doc, "tabButton.css").unwrap();
        let (path, message) = match outcome {
            Injection::InjectedEmpty { path, message } => (path, message),
            other => panic!("expected an empty injection, got {other:?}"),
        };
        assert_eq!(message, "stream closed");
        let node = doc.get(&path).unwrap();
        assert_eq!(node.name, "style");
        assert!(node.children.is_empty());
    }
}
