//! Shared types, error model, and configuration for tabpanel.
//!
//! This crate is the foundation depended on by all other tabpanel crates.
//! It provides:
//! - [`TabPanelError`] — the unified error type
//! - Shared enums ([`OrphanPolicy`], [`AssetKind`])
//! - Configuration ([`AppConfig`], [`AssembleOptions`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, AssembleOptions, AssemblyConfig, AssetsConfig, MarkersConfig, config_dir,
    config_file_path, init_config_at, load_config, load_config_from,
};
pub use error::{Result, TabPanelError};
pub use types::{AssetKind, OrphanPolicy};
