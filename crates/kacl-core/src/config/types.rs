//! Settings types

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::defaults::{DEFAULT_CHANGELOG_FILE, DEFAULT_INDENT, DEFAULT_TAB_WIDTH};

/// Top-level settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Changelog file handling
    pub changelog: ChangelogSettings,
}

/// How the changelog file is located and laid out
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChangelogSettings {
    /// Changelog file path
    pub file: PathBuf,

    /// Spaces per nesting level when rendering
    pub indent: usize,

    /// Spaces a tab character expands to when parsing
    pub tab_width: usize,
}

impl Default for ChangelogSettings {
    fn default() -> Self {
        Self {
            file: PathBuf::from(DEFAULT_CHANGELOG_FILE),
            indent: DEFAULT_INDENT,
            tab_width: DEFAULT_TAB_WIDTH,
        }
    }
}
