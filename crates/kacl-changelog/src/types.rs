//! Changelog types

use std::borrow::Borrow;
use std::sync::LazyLock;

use indexmap::IndexMap;
use kacl_core::error::VersionError;
use kacl_core::types::{BumpType, ChangeType};
use regex::Regex;
use serde::Serialize;

/// Tag of the section collecting changes not yet released
pub const UNRELEASED: &str = "Unreleased";

static SEMVER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+\.[0-9]+\.[0-9]+$").expect("Invalid regex"));

/// Label of a release section: `Unreleased` or a semantic version
///
/// Other labels are accepted but cannot be bumped automatically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ReleaseTag(String);

impl ReleaseTag {
    /// Create a tag from any label
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// The `Unreleased` sentinel tag
    pub fn unreleased() -> Self {
        Self(UNRELEASED.to_string())
    }

    /// Create a tag from a semantic version
    pub fn from_semver(version: &semver::Version) -> Self {
        Self(format!("{}.{}.{}", version.major, version.minor, version.patch))
    }

    /// The tag text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the `Unreleased` sentinel
    pub fn is_unreleased(&self) -> bool {
        self.0 == UNRELEASED
    }

    /// Whether the tag is shaped like `MAJOR.MINOR.PATCH`
    pub fn is_semver(&self) -> bool {
        SEMVER_REGEX.is_match(&self.0)
    }

    /// Parse the tag as a semantic version
    pub fn semver(&self) -> Result<semver::Version, VersionError> {
        if !self.is_semver() {
            return Err(VersionError::NotSemantic(self.0.clone()));
        }
        let parts = self
            .0
            .split('.')
            .map(str::parse::<u64>)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| VersionError::ParseFailed(self.0.clone(), e.to_string()))?;
        // The regex guarantees exactly three components
        Ok(semver::Version::new(parts[0], parts[1], parts[2]))
    }

    /// The tag after applying a bump
    pub fn bump(&self, bump: BumpType) -> Result<ReleaseTag, VersionError> {
        Ok(Self::from_semver(&bump.apply(&self.semver()?)?))
    }
}

impl std::fmt::Display for ReleaseTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ReleaseTag {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

impl From<String> for ReleaseTag {
    fn from(tag: String) -> Self {
        Self(tag)
    }
}

impl Borrow<str> for ReleaseTag {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// One changelog bullet, possibly with nested bullets
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Entry {
    /// Entry text, continuation lines joined with single spaces
    pub text: String,
    /// Nested entries
    pub children: Vec<Entry>,
}

impl Entry {
    /// Create an entry without children
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            children: Vec::new(),
        }
    }

    /// Set the children
    pub fn with_children(mut self, children: Vec<Entry>) -> Self {
        self.children = children;
        self
    }

    /// Whether this entry or any descendant mentions `needle`
    pub fn mentions(&self, needle: &str) -> bool {
        self.text.contains(needle) || self.children.iter().any(|child| child.mentions(needle))
    }
}

/// The changes of one release, grouped by change type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReleaseSection {
    /// Entries per change type, in insertion order
    ///
    /// A change type with no entries renders as nothing, so it does not
    /// survive a render and parse.
    pub entries: IndexMap<ChangeType, Vec<Entry>>,
    /// Release date (`YYYY-MM-DD`); absent for unreleased changes
    pub timestamp: Option<String>,
}

impl ReleaseSection {
    /// Create an empty section
    pub fn new(timestamp: Option<String>) -> Self {
        Self {
            entries: IndexMap::new(),
            timestamp,
        }
    }

    /// Add entries under a change type; an empty list adds nothing
    pub fn with_entries(mut self, change_type: ChangeType, entries: Vec<Entry>) -> Self {
        if !entries.is_empty() {
            self.entries.entry(change_type).or_default().extend(entries);
        }
        self
    }

    /// Append an entry under a change type
    pub fn push(&mut self, change_type: ChangeType, entry: Entry) {
        self.entries.entry(change_type).or_default().push(entry);
    }

    /// Check if the section has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.values().all(Vec::is_empty)
    }

    /// Whether any entry at any depth mentions `needle`
    pub fn mentions(&self, needle: &str) -> bool {
        self.entries
            .values()
            .flatten()
            .any(|entry| entry.mentions(needle))
    }
}
