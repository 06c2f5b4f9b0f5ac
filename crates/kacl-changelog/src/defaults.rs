//! The skeleton written by `kacl init`

use indexmap::IndexMap;
use kacl_core::error::Result;
use kacl_core::template::Template;
use kacl_core::types::ConfigField;

use crate::changelog::{Changelog, HEAD_TAG, INITIAL_TAG};
use crate::types::{ReleaseSection, ReleaseTag, UNRELEASED};

/// Header of a freshly initialised changelog
pub const DEFAULT_HEADER: &str = "# Changelog
All notable changes to this project will be documented in this file.

The format is based on [Keep a Changelog] and this project adheres to
[Semantic Versioning].

Types of changes are:
* **Security** in case of vulnerabilities.
* **Deprecated** for soon-to-be removed features.
* **Added** for new features.
* **Changed** for changes in existing functionality.
* **Removed** for now removed features.
* **Fixed** for any bug fixes.";

/// Reference links the default header points at
pub const DEFAULT_LINKS: [(&str, &str); 2] = [
    ("Keep a Changelog", "http://keepachangelog.com/en/1.0.0/"),
    ("Semantic Versioning", "http://semver.org/spec/v2.0.0.html"),
];

impl Changelog {
    /// A new changelog with the default header and an empty Unreleased section
    ///
    /// Fails if `release_link_format` is not a valid template.
    pub fn initial(release_link_format: &str, breaking_change_token: &str) -> Result<Self> {
        let unreleased_link = Template::parse(release_link_format)?
            .format(&[("previous_tag", INITIAL_TAG), ("tag", HEAD_TAG)])?;

        let mut changelog = Changelog {
            header: DEFAULT_HEADER.to_string(),
            ..Default::default()
        };
        changelog
            .config
            .set(ConfigField::ReleaseLinkFormat, release_link_format);
        changelog
            .config
            .set(ConfigField::BreakingChangeToken, breaking_change_token);
        changelog
            .releases
            .insert(ReleaseTag::unreleased(), ReleaseSection::default());

        let mut links = IndexMap::new();
        links.insert(UNRELEASED.to_string(), unreleased_link);
        links.extend(
            DEFAULT_LINKS
                .iter()
                .map(|(name, target)| (name.to_string(), target.to_string())),
        );
        changelog.links = links;

        Ok(changelog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{dumps, loads};
    use kacl_core::ChangelogError;

    const LINK_FORMAT: &str = "https://github.com/user/repo/compare/{previous_tag}..{tag}";

    #[test]
    fn test_initial_changelog() {
        let changelog = Changelog::initial(LINK_FORMAT, "BREAKING").unwrap();
        assert!(changelog.validate().is_ok());
        assert!(changelog.releases[UNRELEASED].is_empty());
        assert_eq!(
            changelog.links[UNRELEASED],
            "https://github.com/user/repo/compare/initial..HEAD"
        );
        let names: Vec<&str> = changelog.links.keys().map(String::as_str).collect();
        assert_eq!(
            names,
            vec!["Unreleased", "Keep a Changelog", "Semantic Versioning"]
        );
    }

    #[test]
    fn test_initial_changelog_renders_and_parses() {
        let changelog = Changelog::initial(LINK_FORMAT, "⚠ BREAKING").unwrap();
        let text = dumps(&changelog).unwrap();

        assert!(text.starts_with("# Changelog\n"));
        assert!(text.contains("## [Unreleased]\n\n[Unreleased]: "));
        assert!(text.ends_with("[_breaking_change_token]: %E2%9A%A0+BREAKING\n"));
        assert_eq!(loads(&text).unwrap(), changelog);
    }

    #[test]
    fn test_initial_changelog_bad_template() {
        assert!(matches!(
            Changelog::initial("https://example.com/{previous tag}", "BREAKING"),
            Err(ChangelogError::Template(_))
        ));
    }
}
