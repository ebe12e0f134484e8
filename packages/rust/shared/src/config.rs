//! Application configuration for tabpanel.
//!
//! User config lives at `~/.tabpanel/tabpanel.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, TabPanelError};
use crate::types::OrphanPolicy;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "tabpanel.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".tabpanel";

// ---------------------------------------------------------------------------
// Config structs (matching tabpanel.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Class names shared between the markup and the injected script.
    #[serde(default)]
    pub markers: MarkersConfig,

    /// Style/script resources.
    #[serde(default)]
    pub assets: AssetsConfig,

    /// Assembly behavior.
    #[serde(default)]
    pub assembly: AssemblyConfig,
}

/// `[markers]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkersConfig {
    /// Class of the `div` holding the buttons.
    #[serde(default = "default_button_bar_class")]
    pub button_bar_class: String,

    /// Class of the `div` holding the content blocks.
    #[serde(default = "default_content_container_class")]
    pub content_container_class: String,

    /// Class marking the displayable node inside each fragment.
    #[serde(default = "default_content_class")]
    pub content_class: String,

    /// Class put on every generated button.
    #[serde(default = "default_button_class")]
    pub button_class: String,
}

impl Default for MarkersConfig {
    fn default() -> Self {
        Self {
            button_bar_class: default_button_bar_class(),
            content_container_class: default_content_container_class(),
            content_class: default_content_class(),
            button_class: default_button_class(),
        }
    }
}

fn default_button_bar_class() -> String {
    "tab".into()
}
fn default_content_container_class() -> String {
    "tabcontentdiv".into()
}
fn default_content_class() -> String {
    "tabcontent".into()
}
fn default_button_class() -> String {
    "tablinks".into()
}

/// `[assets]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetsConfig {
    /// Resource name of the style sheet.
    #[serde(default = "default_style_asset")]
    pub style: String,

    /// Resource name of the toggling script.
    #[serde(default = "default_script_asset")]
    pub script: String,

    /// Directory to load assets from. Built-in assets are used when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            style: default_style_asset(),
            script: default_script_asset(),
            dir: None,
        }
    }
}

fn default_style_asset() -> String {
    "tabButton.css".into()
}
fn default_script_asset() -> String {
    "tabButton.js".into()
}

/// `[assembly]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssemblyConfig {
    /// Fate of fragments without a content node.
    #[serde(default)]
    pub orphan_policy: OrphanPolicy,
}

// ---------------------------------------------------------------------------
// Assemble options (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime assembly configuration, merged from the config file and CLI flags.
#[derive(Debug, Clone)]
pub struct AssembleOptions {
    /// Marker classes.
    pub markers: MarkersConfig,
    /// Style resource name.
    pub style_asset: String,
    /// Script resource name.
    pub script_asset: String,
    /// Fate of fragments without a content node.
    pub orphan_policy: OrphanPolicy,
}

impl Default for AssembleOptions {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for AssembleOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            markers: config.markers.clone(),
            style_asset: config.assets.style.clone(),
            script_asset: config.assets.script.clone(),
            orphan_policy: config.assembly.orphan_policy,
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.tabpanel/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| TabPanelError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.tabpanel/tabpanel.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| TabPanelError::io(path, e))?;

    let config: AppConfig = toml::from_str(&content).map_err(|e| {
        TabPanelError::config(format!("failed to parse {}: {e}", path.display()))
    })?;
    validate_markers(&config.markers)?;
    Ok(config)
}

/// Write a default config file at `path` (usually [`config_file_path`]),
/// creating its parent directories. Returns the path written.
pub fn init_config_at(path: &Path) -> Result<PathBuf> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| TabPanelError::io(dir, e))?;
    }

    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| TabPanelError::config(e.to_string()))?;

    std::fs::write(path, content).map_err(|e| TabPanelError::io(path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path.to_path_buf())
}

/// Marker classes are matched as single class tokens, so they must be
/// non-empty and free of whitespace.
fn validate_markers(markers: &MarkersConfig) -> Result<()> {
    let all = [
        ("button_bar_class", &markers.button_bar_class),
        ("content_container_class", &markers.content_container_class),
        ("content_class", &markers.content_class),
        ("button_class", &markers.button_class),
    ];
    for (key, value) in all {
        if value.is_empty() || value.chars().any(char::is_whitespace) {
            return Err(TabPanelError::config(format!(
                "markers.{key} must be a single class name, got {value:?}"
            )));
        }
    }
    if markers.content_class == markers.content_container_class {
        return Err(TabPanelError::config(
            "markers.content_class and markers.content_container_class must differ",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(content: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("tp-config-test-{}", uuid::Uuid::now_v7()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(CONFIG_FILE_NAME);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("tabcontentdiv"));
        assert!(toml_str.contains("tabButton.js"));
        assert!(toml_str.contains("orphan_policy = \"skip\""));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.markers, MarkersConfig::default());
        assert_eq!(parsed.assets.style, "tabButton.css");
        assert!(parsed.assets.dir.is_none());
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[markers]
content_class = "panel"

[assembly]
orphan_policy = "keep"
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.markers.content_class, "panel");
        assert_eq!(config.markers.button_bar_class, "tab");
        assert_eq!(config.assembly.orphan_policy, OrphanPolicy::Keep);
    }

    #[test]
    fn assemble_options_from_app_config() {
        let mut app = AppConfig::default();
        app.assets.script = "custom.js".into();
        let opts = AssembleOptions::from(&app);
        assert_eq!(opts.script_asset, "custom.js");
        assert_eq!(opts.style_asset, "tabButton.css");
        assert_eq!(opts.orphan_policy, OrphanPolicy::Skip);
    }

    #[test]
    fn load_rejects_bad_marker() {
        let path = temp_file("[markers]\nbutton_class = \"two words\"\n");
        let err = load_config_from(&path).unwrap_err();
        assert!(err.to_string().contains("markers.button_class"));
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn load_rejects_unparseable_file() {
        let path = temp_file("[assembly]\norphan_policy = \"drop\"\n");
        let err = load_config_from(&path).unwrap_err();
        assert!(err.to_string().starts_with("config error: failed to parse"));
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn init_writes_loadable_defaults() {
        let dir = std::env::temp_dir().join(format!("tp-config-test-{}", uuid::Uuid::now_v7()));
        let path = dir.join("deeper").join(CONFIG_FILE_NAME);

        let written = init_config_at(&path).unwrap();
        assert_eq!(written, path);
        let config = load_config_from(&path).unwrap();
        assert_eq!(config.assembly.orphan_policy, OrphanPolicy::Skip);
        assert_eq!(config.assets.style, "tabButton.css");

        let _ = std::fs::remove_dir_all(&dir);
    }
}
