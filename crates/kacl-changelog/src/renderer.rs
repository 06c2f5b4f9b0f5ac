//! Changelog renderer
//!
//! Produces the canonical text of a document; parsing the output yields the
//! same document again.

use kacl_core::config::DEFAULT_INDENT;
use kacl_core::error::Result;
use tracing::{debug, instrument};

use crate::changelog::Changelog;
use crate::types::{Entry, ReleaseSection, ReleaseTag};

/// Bullet glyphs, cycled by nesting depth
const BULLETS: [char; 3] = ['*', '-', '+'];

/// Renderer for Keep a Changelog documents
#[derive(Debug, Clone)]
pub struct Renderer {
    /// Spaces per nesting level
    pub indent: usize,
}

impl Renderer {
    /// Create a renderer with the default indent
    pub fn new() -> Self {
        Self {
            indent: DEFAULT_INDENT,
        }
    }

    /// Create a renderer with a custom indent
    pub fn with_indent(indent: usize) -> Self {
        Self { indent }
    }

    /// Render a changelog to text
    ///
    /// Change types without entries are left out of the output.
    #[instrument(skip(self, changelog), fields(releases = changelog.releases.len()))]
    pub fn render(&self, changelog: &Changelog) -> Result<String> {
        changelog.validate()?;

        let mut blocks = Vec::new();

        let header = changelog.header.trim();
        if !header.is_empty() {
            blocks.push(header.to_string());
        }

        blocks.extend(
            changelog
                .releases
                .iter()
                .map(|(tag, section)| self.render_release(tag, section)),
        );

        let release_links = changelog
            .releases
            .keys()
            .filter_map(|tag| {
                changelog
                    .links
                    .get(tag.as_str())
                    .map(|target| link_line(tag.as_str(), target))
            })
            .collect::<Vec<_>>();
        blocks.push(release_links.join("\n"));

        let other_links = changelog
            .links
            .iter()
            .filter(|(name, _)| !changelog.releases.contains_key(name.as_str()))
            .map(|(name, target)| link_line(name, target))
            .collect::<Vec<_>>();
        if !other_links.is_empty() {
            blocks.push(other_links.join("\n"));
        }

        let config_lines = changelog
            .config
            .encoded_fields()
            .into_iter()
            .map(|(field, value)| link_line(&field.link_name(), &value))
            .collect::<Vec<_>>();
        if !config_lines.is_empty() {
            blocks.push(config_lines.join("\n"));
        }

        let mut output = blocks.join("\n\n");
        output.push('\n');

        debug!(output_len = output.len(), "changelog rendered");
        Ok(output)
    }

    fn render_release(&self, tag: &ReleaseTag, section: &ReleaseSection) -> String {
        let mut output = format!("## [{}]", tag);
        if let Some(timestamp) = &section.timestamp {
            output.push_str(" - ");
            output.push_str(timestamp);
        }

        let mut change_types = section
            .entries
            .iter()
            .filter(|(_, entries)| !entries.is_empty())
            .collect::<Vec<_>>();
        change_types.sort_by_key(|(change_type, _)| change_type.as_str());

        let subsections = change_types
            .into_iter()
            .map(|(change_type, entries)| {
                let mut lines = vec![format!("### {}", change_type)];
                for entry in entries {
                    self.render_entry(entry, 0, &mut lines);
                }
                lines.join("\n")
            })
            .collect::<Vec<_>>();

        if !subsections.is_empty() {
            output.push('\n');
            output.push_str(&subsections.join("\n\n"));
        }
        output
    }

    fn render_entry(&self, entry: &Entry, depth: usize, lines: &mut Vec<String>) {
        lines.push(format!(
            "{}{} {}",
            " ".repeat(self.indent * depth),
            BULLETS[depth % BULLETS.len()],
            entry.text
        ));
        for child in &entry.children {
            self.render_entry(child, depth + 1, lines);
        }
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

fn link_line(name: &str, target: &str) -> String {
    format!("[{}]: {}", name, target)
}

/// Render a changelog with the default indent
pub fn dumps(changelog: &Changelog) -> Result<String> {
    Renderer::new().render(changelog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::loads;
    use kacl_core::types::{ChangeType, ConfigField};
    use kacl_core::{ChangelogError, ValidationError};

    fn minimal() -> Changelog {
        let mut changelog = Changelog::default();
        changelog.config.breaking_change_token = None;
        changelog
            .releases
            .insert(ReleaseTag::unreleased(), ReleaseSection::default());
        changelog
            .links
            .insert("Unreleased".to_string(), "http://x".to_string());
        changelog
    }

    #[test]
    fn test_render_minimal() {
        assert_eq!(
            dumps(&minimal()).unwrap(),
            "## [Unreleased]\n\n[Unreleased]: http://x\n"
        );
    }

    #[test]
    fn test_render_requires_valid_document() {
        let err = dumps(&Changelog::default()).unwrap_err();
        assert!(matches!(
            err,
            ChangelogError::Validation(ValidationError::NoReleases)
        ));

        let mut changelog = minimal();
        changelog.links.clear();
        assert!(matches!(
            dumps(&changelog),
            Err(ChangelogError::Validation(ValidationError::MissingLinks(_)))
        ));
    }

    #[test]
    fn test_change_types_render_alphabetically() {
        let mut changelog = minimal();
        for change_type in [ChangeType::Security, ChangeType::Fixed, ChangeType::Added] {
            changelog
                .add_entry(change_type, &[change_type.as_str()], false, None)
                .unwrap();
        }

        assert_eq!(
            dumps(&changelog).unwrap(),
            "## [Unreleased]
### Added
* Added

### Fixed
* Fixed

### Security
* Security

[Unreleased]: http://x
"
        );
    }

    #[test]
    fn test_empty_change_types_are_dropped() {
        let mut changelog = minimal();
        changelog.releases[0].entries.insert(ChangeType::Added, Vec::new());

        let text = dumps(&changelog).unwrap();
        assert_eq!(text, "## [Unreleased]\n\n[Unreleased]: http://x\n");
        assert!(loads(&text).unwrap().releases[0].entries.is_empty());
    }

    #[test]
    fn test_bullets_cycle_by_depth() {
        let mut changelog = minimal();
        changelog.releases[0].push(
            ChangeType::Added,
            Entry::new("one").with_children(vec![Entry::new("two").with_children(vec![
                Entry::new("three").with_children(vec![Entry::new("four")]),
            ])]),
        );

        let text = Renderer::with_indent(4).render(&changelog).unwrap();
        assert!(text.contains("* one\n    - two\n        + three\n            * four\n"));
    }

    #[test]
    fn test_links_are_grouped() {
        let mut changelog = minimal();
        changelog
            .links
            .shift_insert(0, "Keep a Changelog".to_string(), "http://k".to_string());
        changelog
            .releases
            .insert(ReleaseTag::from("0.1.0"), ReleaseSection::new(Some("2021-04-12".into())));
        changelog
            .links
            .insert("0.1.0".to_string(), "http://y".to_string());
        changelog.header = "# Changelog\n".to_string();

        assert_eq!(
            dumps(&changelog).unwrap(),
            "# Changelog

## [Unreleased]

## [0.1.0] - 2021-04-12

[Unreleased]: http://x
[0.1.0]: http://y

[Keep a Changelog]: http://k
"
        );
    }

    #[test]
    fn test_config_lines_last() {
        let mut changelog = minimal();
        changelog
            .config
            .set(ConfigField::BreakingChangeToken, "BREAKING CHANGE:");
        changelog
            .config
            .set(ConfigField::ReleaseLinkFormat, "http://x/{previous_tag}..{tag}");

        let text = dumps(&changelog).unwrap();
        assert!(text.ends_with(
            "[Unreleased]: http://x

[_release_link_format]: http://x/{previous_tag}..{tag}
[_breaking_change_token]: BREAKING+CHANGE%3A
"
        ));
        assert_eq!(loads(&text).unwrap(), changelog);
    }

    #[test]
    fn test_round_trip_canonical_text() {
        let text = "# Changelog
Some header text.

## [Unreleased]
### Changed
* A change
  split over lines

## [1.0.0] - 2021-04-12
### Added
* A parent
  - A child
    + A grandchild

### Removed
* Something old

[Unreleased]: http://x/1.0.0..HEAD
[1.0.0]: http://x/initial..1.0.0

[Keep a Changelog]: http://keepachangelog.com/en/1.0.0/

[_breaking_change_token]: BREAKING
";
        let changelog = loads(text).unwrap();
        let rendered = dumps(&changelog).unwrap();
        assert_eq!(
            rendered,
            text.replace("* A change\n  split over lines", "* A change split over lines")
        );
        assert_eq!(loads(&rendered).unwrap(), changelog);
    }
}
