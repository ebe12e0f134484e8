//! Tabbed-panel assembly for tabpanel.
//!
//! Merges independently produced HTML fragments into one document with a
//! button per fragment and a content area that shows one fragment at a time.
//!
//! - [`StructuralLocator`] — locate-or-create for heading, assets, bar, container
//! - [`TitleResolver`] — button labels
//! - [`TabButtonFactory`] — button markup
//! - [`AssetInjector`] / [`AssetCache`] — style and script injection
//! - [`DocumentAssembler`] — the orchestration

pub mod assembler;
pub mod assets;
pub mod button;
pub mod fragment;
pub mod locator;
pub mod report;
pub mod title;

pub use assembler::DocumentAssembler;
pub use assets::{AssetCache, AssetInjector, AssetLoader, BuiltinAssets, DirAssets, Injection};
pub use button::{TabButton, TabButtonFactory};
pub use fragment::{Fragment, FragmentSource};
pub use locator::{KindSpec, Located, Region, StructuralKind, StructuralLocator};
pub use report::{AssemblyReport, Diagnostic, DiagnosticKind, TabSummary};
pub use title::TitleResolver;
