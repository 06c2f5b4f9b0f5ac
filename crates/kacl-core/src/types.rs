//! Core types for kacl

use serde::{Deserialize, Serialize};

use crate::error::{ChangelogError, VersionError};

/// Category grouping entries within a release
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeType {
    /// In case of vulnerabilities
    Security,
    /// Soon-to-be removed features
    Deprecated,
    /// New features
    Added,
    /// Changes in existing functionality
    Changed,
    /// Now removed features
    Removed,
    /// Bug fixes
    Fixed,
}

impl ChangeType {
    /// All change types, in the order the convention lists them
    pub const ALL: [ChangeType; 6] = [
        Self::Security,
        Self::Deprecated,
        Self::Added,
        Self::Changed,
        Self::Removed,
        Self::Fixed,
    ];

    /// Returns the heading keyword for this change type
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Security => "Security",
            Self::Deprecated => "Deprecated",
            Self::Added => "Added",
            Self::Changed => "Changed",
            Self::Removed => "Removed",
            Self::Fixed => "Fixed",
        }
    }
}

impl std::fmt::Display for ChangeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ChangeType {
    type Err = ChangelogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|change_type| change_type.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ChangelogError::UnknownChangeType(s.to_string()))
    }
}

/// Semantic version component to increment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BumpType {
    /// Breaking changes
    Major,
    /// New functionality
    Minor,
    /// Fixes only
    Patch,
}

impl BumpType {
    /// Returns the string representation of the bump type
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Major => "major",
            Self::Minor => "minor",
            Self::Patch => "patch",
        }
    }

    /// Increment the matching component and zero every lower-order one
    pub fn apply(&self, version: &semver::Version) -> Result<semver::Version, VersionError> {
        let overflow = || VersionError::Overflow {
            version: version.to_string(),
            bump: *self,
        };
        Ok(match self {
            Self::Major => {
                semver::Version::new(version.major.checked_add(1).ok_or_else(overflow)?, 0, 0)
            }
            Self::Minor => semver::Version::new(
                version.major,
                version.minor.checked_add(1).ok_or_else(overflow)?,
                0,
            ),
            Self::Patch => semver::Version::new(
                version.major,
                version.minor,
                version.patch.checked_add(1).ok_or_else(overflow)?,
            ),
        })
    }
}

impl std::fmt::Display for BumpType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for BumpType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "major" => Ok(Self::Major),
            "minor" => Ok(Self::Minor),
            "patch" => Ok(Self::Patch),
            _ => Err(format!("Unknown bump type: {}", s)),
        }
    }
}

/// Config fields embedded in the changelog as `[_field]: value` links
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigField {
    /// Template for comparison links, e.g. `.../compare/{previous_tag}..{tag}`
    ReleaseLinkFormat,
    /// Marker prefixed to breaking entries
    BreakingChangeToken,
}

impl ConfigField {
    /// All fields, in rendering order
    pub const ALL: [ConfigField; 2] = [Self::ReleaseLinkFormat, Self::BreakingChangeToken];

    /// Returns the field name as written after the underscore
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ReleaseLinkFormat => "release_link_format",
            Self::BreakingChangeToken => "breaking_change_token",
        }
    }

    /// Resolve an underscore-prefixed link name, e.g. `_breaking_change_token`
    pub fn from_link_name(name: &str) -> Option<Self> {
        let name = name.strip_prefix('_')?;
        Self::ALL.into_iter().find(|field| field.as_str() == name)
    }

    /// The link name this field is stored under
    pub fn link_name(&self) -> String {
        format!("_{}", self.as_str())
    }
}

impl std::fmt::Display for ConfigField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ConfigField {
    type Err = ChangelogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == normalized)
            .ok_or_else(|| ChangelogError::UnknownConfigField(s.to_string()))
    }
}
