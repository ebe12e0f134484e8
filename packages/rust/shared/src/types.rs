//! Small shared enums used by both config and the assembler.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// OrphanPolicy
// ---------------------------------------------------------------------------

/// What to do with a fragment that has no content node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrphanPolicy {
    /// Drop the fragment entirely: no button, no content.
    #[default]
    Skip,
    /// Emit the button even though it targets nothing.
    Keep,
}

impl std::fmt::Display for OrphanPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Skip => f.write_str("skip"),
            Self::Keep => f.write_str("keep"),
        }
    }
}

impl std::str::FromStr for OrphanPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "skip" => Ok(Self::Skip),
            "keep" => Ok(Self::Keep),
            other => Err(format!("unknown orphan policy '{other}'")),
        }
    }
}

// ---------------------------------------------------------------------------
// AssetKind
// ---------------------------------------------------------------------------

/// The two kinds of injected asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Style,
    Script,
}

impl AssetKind {
    /// Tag name of the node that wraps this asset's text.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Style => "style",
            Self::Script => "script",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orphan_policy_parses_case_insensitively() {
        assert_eq!("Keep".parse::<OrphanPolicy>(), Ok(OrphanPolicy::Keep));
        assert_eq!(" skip ".parse::<OrphanPolicy>(), Ok(OrphanPolicy::Skip));
        assert!("drop".parse::<OrphanPolicy>().is_err());
    }

    #[test]
    fn orphan_policy_default_is_skip() {
        assert_eq!(OrphanPolicy::default(), OrphanPolicy::Skip);
        assert_eq!(OrphanPolicy::Keep.to_string(), "keep");
    }
}
