//! Error types for tabpanel.
//!
//! Library crates use [`TabPanelError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all tabpanel operations.
#[derive(Debug, thiserror::Error)]
pub enum TabPanelError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// HTML parsing error (fragment or existing document).
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A required style/script resource could not be located.
    #[error("asset not found: {name}")]
    AssetNotFound { name: String },

    /// A style/script resource exists but could not be read.
    #[error("asset {name} is unreadable: {message}")]
    AssetUnreadable { name: String, message: String },

    /// No title attribute, title element, or identifier on a fragment.
    #[error("no title could be resolved for fragment {fragment}")]
    MissingTitle { fragment: String },

    /// A node handle no longer points at an element.
    #[error("node handle {path} does not resolve")]
    InvalidHandle { path: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, TabPanelError>;

impl TabPanelError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Create an invalid-handle error for any displayable path.
    pub fn invalid_handle(path: impl std::fmt::Display) -> Self {
        Self::InvalidHandle {
            path: path.to_string(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = TabPanelError::config("unknown orphan policy");
        assert_eq!(err.to_string(), "config error: unknown orphan policy");

        let err = TabPanelError::AssetNotFound {
            name: "tabButton.css".into(),
        };
        assert!(err.to_string().contains("tabButton.css"));
    }
}
