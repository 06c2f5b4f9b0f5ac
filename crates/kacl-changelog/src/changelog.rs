//! The changelog document and its mutations

use chrono::{Local, NaiveDate};
use indexmap::IndexMap;
use kacl_core::error::{ChangelogError, Result, ValidationError};
use kacl_core::template::Template;
use kacl_core::types::{BumpType, ChangeType, ConfigField};
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::config::{ChangelogConfig, DEFAULT_BREAKING_CHANGE_TOKEN};
use crate::types::{Entry, ReleaseSection, ReleaseTag, UNRELEASED};

/// First version cut when no release exists yet
const SEED_TAG: &str = "0.1.0";

/// Previous tag used in the first release's link
pub(crate) const INITIAL_TAG: &str = "initial";

/// Endpoint used for the Unreleased link when the old one is unrecoverable
pub(crate) const HEAD_TAG: &str = "HEAD";

/// A Keep a Changelog document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Changelog {
    /// Free text before the first release heading
    pub header: String,
    /// Config embedded as underscore links
    pub config: ChangelogConfig,
    /// Release sections, most recent first with Unreleased on top
    pub releases: IndexMap<ReleaseTag, ReleaseSection>,
    /// Link definitions (release tags and arbitrary references)
    pub links: IndexMap<String, String>,
}

impl Changelog {
    /// Check that there is at least one release and every release is linked
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        if self.releases.is_empty() {
            return Err(ValidationError::NoReleases);
        }
        let missing: Vec<String> = self
            .releases
            .keys()
            .filter(|tag| !self.links.contains_key(tag.as_str()))
            .map(|tag| tag.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(ValidationError::MissingLinks(missing));
        }
        Ok(())
    }

    /// Most recent release other than Unreleased
    pub fn latest_tag(&self) -> Option<&ReleaseTag> {
        self.releases.keys().find(|tag| !tag.is_unreleased())
    }

    /// Entries waiting for the next release
    pub fn unreleased(&self) -> Option<&ReleaseSection> {
        self.releases.get(UNRELEASED)
    }

    /// Add an entry, under Unreleased unless `tag` is given
    ///
    /// The first item is the entry text; any further items become its
    /// children. Breaking entries are prefixed with the configured token.
    pub fn add_entry<S: AsRef<str>>(
        &mut self,
        change_type: ChangeType,
        items: &[S],
        breaking: bool,
        tag: Option<&str>,
    ) -> Result<()> {
        let (first, rest) = items.split_first().ok_or(ChangelogError::EmptyEntry)?;
        let text = if breaking {
            let token = self.config.get(ConfigField::BreakingChangeToken)?;
            format!("{} {}", token, first.as_ref())
        } else {
            first.as_ref().to_string()
        };
        let entry = Entry::new(text).with_children(
            rest.iter()
                .map(|item| Entry::new(item.as_ref()))
                .collect(),
        );

        let tag = tag.map(ReleaseTag::from).unwrap_or_else(ReleaseTag::unreleased);
        debug!(%tag, %change_type, breaking, "adding entry");
        self.releases
            .entry(tag)
            .or_default()
            .push(change_type, entry);
        Ok(())
    }

    /// The tag the next release would get
    ///
    /// Without `force`, the bump is inferred from the Unreleased entries:
    /// major for a breaking token (once past 0.x), minor for anything other
    /// than fixes, patch otherwise.
    pub fn next_tag(&self, force: Option<BumpType>) -> Result<ReleaseTag> {
        let Some(latest) = self.latest_tag() else {
            return Ok(ReleaseTag::from(SEED_TAG));
        };
        let current = latest.semver()?;
        let bump = force.unwrap_or_else(|| self.infer_bump(&current));
        debug!(%latest, %bump, forced = force.is_some(), "computing next tag");
        Ok(ReleaseTag::from_semver(&bump.apply(&current)?))
    }

    fn infer_bump(&self, current: &semver::Version) -> BumpType {
        let Some(unreleased) = self.unreleased() else {
            return BumpType::Patch;
        };
        let token = self
            .config
            .get_or(ConfigField::BreakingChangeToken, DEFAULT_BREAKING_CHANGE_TOKEN);

        if current.major > 0 && unreleased.mentions(token) {
            BumpType::Major
        } else if unreleased
            .entries
            .keys()
            .any(|change_type| *change_type != ChangeType::Fixed)
        {
            BumpType::Minor
        } else {
            BumpType::Patch
        }
    }

    /// Move the Unreleased entries into a new release dated today
    pub fn cut_release(
        &mut self,
        force: Option<BumpType>,
        tag: Option<&str>,
    ) -> Result<(ReleaseTag, ReleaseSection)> {
        self.cut_release_on(force, tag, Local::now().date_naive())
    }

    /// Move the Unreleased entries into a new release with the given date
    ///
    /// The release tag is `tag` if given, else [`Changelog::next_tag`]. The
    /// new release is linked with the release link format, and the
    /// Unreleased link is rewritten to compare from the new tag. On error
    /// the changelog is left untouched.
    #[instrument(skip(self))]
    pub fn cut_release_on(
        &mut self,
        force: Option<BumpType>,
        tag: Option<&str>,
        date: NaiveDate,
    ) -> Result<(ReleaseTag, ReleaseSection)> {
        let link_format = Template::parse(self.config.get(ConfigField::ReleaseLinkFormat)?)?;
        let previous_tag = self.latest_tag().cloned();
        let release_tag = match tag {
            Some(tag) => ReleaseTag::from(tag),
            None => self.next_tag(force)?,
        };
        if self.releases.contains_key(&release_tag) {
            return Err(ChangelogError::ReleaseExists(release_tag.to_string()));
        }

        let release_link = link_format.format(&[
            (
                "previous_tag",
                previous_tag.as_ref().map_or(INITIAL_TAG, ReleaseTag::as_str),
            ),
            ("tag", release_tag.as_str()),
        ])?;
        let head = match self.links.get(UNRELEASED) {
            Some(link) => link_format
                .reverse(link, false)
                .and_then(|mut values| values.shift_remove("tag"))
                .unwrap_or_else(|| HEAD_TAG.to_string()),
            None => HEAD_TAG.to_string(),
        };
        let unreleased_link =
            link_format.format(&[("previous_tag", release_tag.as_str()), ("tag", head.as_str())])?;

        // Everything fallible is done; commit.
        let mut section = self
            .releases
            .shift_remove(UNRELEASED)
            .unwrap_or_default();
        section.timestamp = Some(date.format("%Y-%m-%d").to_string());

        let mut releases = IndexMap::with_capacity(self.releases.len() + 2);
        releases.insert(ReleaseTag::unreleased(), ReleaseSection::default());
        releases.insert(release_tag.clone(), section.clone());
        releases.extend(self.releases.drain(..));
        self.releases = releases;

        let mut links = IndexMap::with_capacity(self.links.len() + 2);
        links.insert(UNRELEASED.to_string(), unreleased_link);
        links.insert(release_tag.to_string(), release_link);
        for (name, target) in self.links.drain(..) {
            links.entry(name).or_insert(target);
        }
        self.links = links;

        info!(
            tag = %release_tag,
            previous = ?previous_tag.as_ref().map(ReleaseTag::as_str),
            entries = section.entries.values().map(Vec::len).sum::<usize>(),
            "release cut"
        );
        Ok((release_tag, section))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kacl_core::error::VersionError;

    const LINK_FORMAT: &str = "https://github.com/user/repo/compare/{previous_tag}..{tag}";

    fn changelog_with(tags: &[&str]) -> Changelog {
        let mut changelog = Changelog::default();
        changelog.config.set(ConfigField::ReleaseLinkFormat, LINK_FORMAT);
        for tag in tags {
            let timestamp = (*tag != UNRELEASED).then(|| "2021-04-12".to_string());
            changelog
                .releases
                .insert(ReleaseTag::from(*tag), ReleaseSection::new(timestamp));
            changelog
                .links
                .insert(tag.to_string(), format!("http://example.com/{}", tag));
        }
        changelog
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 17).unwrap()
    }

    #[test]
    fn test_validate() {
        assert_eq!(
            Changelog::default().validate(),
            Err(ValidationError::NoReleases)
        );

        let mut changelog = changelog_with(&["Unreleased", "0.1.0"]);
        assert!(changelog.validate().is_ok());

        changelog.links.shift_remove("0.1.0");
        assert_eq!(
            changelog.validate(),
            Err(ValidationError::MissingLinks(vec!["0.1.0".to_string()]))
        );
    }

    #[test]
    fn test_add_entry_to_empty_changelog() {
        let mut changelog = Changelog::default();
        changelog
            .add_entry(ChangeType::Added, &["A new feature", "More details"], false, None)
            .unwrap();

        let section = &changelog.releases[UNRELEASED];
        assert_eq!(section.timestamp, None);
        assert_eq!(
            section.entries[&ChangeType::Added],
            vec![Entry::new("A new feature").with_children(vec![Entry::new("More details")])]
        );
    }

    #[test]
    fn test_add_breaking_entry() {
        let mut changelog = Changelog::default();
        changelog
            .add_entry(ChangeType::Removed, &["Old API"], true, None)
            .unwrap();
        assert_eq!(
            changelog.releases[UNRELEASED].entries[&ChangeType::Removed][0].text,
            "BREAKING Old API"
        );
    }

    #[test]
    fn test_add_breaking_entry_without_token() {
        let mut changelog = Changelog::default();
        changelog.config.breaking_change_token = None;

        let err = changelog
            .add_entry(ChangeType::Removed, &["Old API"], true, None)
            .unwrap_err();
        assert_eq!(err.missing_field(), Some(ConfigField::BreakingChangeToken));
        assert!(changelog.releases.is_empty());
    }

    #[test]
    fn test_add_entry_to_explicit_tag() {
        let mut changelog = changelog_with(&["Unreleased", "0.1.0"]);
        changelog
            .add_entry(ChangeType::Fixed, &["Backported fix"], false, Some("0.1.0"))
            .unwrap();
        assert!(changelog.releases[UNRELEASED].is_empty());
        assert_eq!(changelog.releases["0.1.0"].entries[&ChangeType::Fixed].len(), 1);
    }

    #[test]
    fn test_add_empty_entry() {
        let mut changelog = Changelog::default();
        let items: [&str; 0] = [];
        assert!(matches!(
            changelog.add_entry(ChangeType::Added, &items, false, None),
            Err(ChangelogError::EmptyEntry)
        ));
    }

    #[test]
    fn test_next_tag_without_releases() {
        let changelog = changelog_with(&["Unreleased"]);
        assert_eq!(changelog.next_tag(None).unwrap().as_str(), "0.1.0");
    }

    #[test]
    fn test_next_tag_inference() {
        let mut changelog = changelog_with(&["Unreleased", "1.0.0"]);
        assert_eq!(changelog.next_tag(None).unwrap().as_str(), "1.0.1");

        changelog
            .add_entry(ChangeType::Fixed, &["A fix"], false, None)
            .unwrap();
        assert_eq!(changelog.next_tag(None).unwrap().as_str(), "1.0.1");

        changelog
            .add_entry(ChangeType::Added, &["A feature"], false, None)
            .unwrap();
        assert_eq!(changelog.next_tag(None).unwrap().as_str(), "1.1.0");

        changelog
            .add_entry(ChangeType::Changed, &["An overhaul"], true, None)
            .unwrap();
        assert_eq!(changelog.next_tag(None).unwrap().as_str(), "2.0.0");
    }

    #[test]
    fn test_next_tag_breaking_in_child_entry() {
        let mut changelog = changelog_with(&["Unreleased", "1.4.2"]);
        changelog
            .add_entry(ChangeType::Fixed, &["A fix", "BREAKING for old clients"], false, None)
            .unwrap();
        assert_eq!(changelog.next_tag(None).unwrap().as_str(), "2.0.0");
    }

    #[test]
    fn test_next_tag_breaking_before_1_0() {
        let mut changelog = changelog_with(&["Unreleased", "0.4.0"]);
        changelog
            .add_entry(ChangeType::Changed, &["Renamed everything"], true, None)
            .unwrap();
        assert_eq!(changelog.next_tag(None).unwrap().as_str(), "0.5.0");
    }

    #[test]
    fn test_next_tag_forced() {
        let changelog = changelog_with(&["Unreleased", "1.2.3"]);
        assert_eq!(
            changelog.next_tag(Some(BumpType::Major)).unwrap().as_str(),
            "2.0.0"
        );
        assert_eq!(
            changelog.next_tag(Some(BumpType::Minor)).unwrap().as_str(),
            "1.3.0"
        );
    }

    #[test]
    fn test_next_tag_overflow_is_an_error() {
        let mut changelog = changelog_with(&["Unreleased", "18446744073709551615.0.0"]);
        assert!(matches!(
            changelog.next_tag(Some(BumpType::Major)),
            Err(ChangelogError::Version(VersionError::Overflow { .. }))
        ));
        assert!(changelog
            .cut_release_on(Some(BumpType::Major), None, date())
            .is_err());
        assert_eq!(changelog.releases.len(), 2);
    }

    #[test]
    fn test_next_tag_not_semantic() {
        let changelog = changelog_with(&["Unreleased", "2021-spring"]);
        assert!(matches!(
            changelog.next_tag(None),
            Err(ChangelogError::Version(_))
        ));
    }

    #[test]
    fn test_cut_release() {
        let mut changelog = changelog_with(&["Unreleased", "0.1.0"]);
        changelog.links.insert(
            UNRELEASED.to_string(),
            "https://github.com/user/repo/compare/0.1.0..HEAD".to_string(),
        );
        changelog.links.insert(
            "Keep a Changelog".to_string(),
            "http://keepachangelog.com/en/1.0.0/".to_string(),
        );
        changelog
            .add_entry(ChangeType::Fixed, &["A fix"], false, None)
            .unwrap();

        let (tag, section) = changelog.cut_release_on(None, None, date()).unwrap();

        assert_eq!(tag.as_str(), "0.1.1");
        assert_eq!(section.timestamp.as_deref(), Some("2024-05-17"));
        assert_eq!(section.entries[&ChangeType::Fixed], vec![Entry::new("A fix")]);

        let order: Vec<&str> = changelog.releases.keys().map(ReleaseTag::as_str).collect();
        assert_eq!(order, vec!["Unreleased", "0.1.1", "0.1.0"]);
        assert!(changelog.releases[UNRELEASED].is_empty());
        assert_eq!(changelog.releases["0.1.1"], section);

        let links: Vec<(&str, &str)> = changelog
            .links
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        assert_eq!(
            links,
            vec![
                ("Unreleased", "https://github.com/user/repo/compare/0.1.1..HEAD"),
                ("0.1.1", "https://github.com/user/repo/compare/0.1.0..0.1.1"),
                ("0.1.0", "http://example.com/0.1.0"),
                ("Keep a Changelog", "http://keepachangelog.com/en/1.0.0/"),
            ]
        );
        assert!(changelog.validate().is_ok());
    }

    #[test]
    fn test_cut_first_release() {
        let mut changelog = changelog_with(&["Unreleased"]);
        changelog.links.insert(
            UNRELEASED.to_string(),
            "https://github.com/user/repo/compare/initial..main".to_string(),
        );
        changelog
            .add_entry(ChangeType::Added, &["Project started"], false, None)
            .unwrap();

        let (tag, _) = changelog.cut_release_on(None, None, date()).unwrap();

        assert_eq!(tag.as_str(), "0.1.0");
        assert_eq!(
            changelog.links["0.1.0"],
            "https://github.com/user/repo/compare/initial..0.1.0"
        );
        // The old endpoint is recovered from the previous Unreleased link
        assert_eq!(
            changelog.links[UNRELEASED],
            "https://github.com/user/repo/compare/0.1.0..main"
        );
    }

    #[test]
    fn test_cut_release_unrecoverable_unreleased_link() {
        let mut changelog = changelog_with(&["Unreleased", "1.0.0"]);
        let (tag, _) = changelog
            .cut_release_on(Some(BumpType::Minor), None, date())
            .unwrap();
        assert_eq!(tag.as_str(), "1.1.0");
        assert_eq!(
            changelog.links[UNRELEASED],
            "https://github.com/user/repo/compare/1.1.0..HEAD"
        );
    }

    #[test]
    fn test_cut_release_explicit_tag() {
        let mut changelog = changelog_with(&["Unreleased", "2021-spring"]);
        let (tag, _) = changelog
            .cut_release_on(None, Some("2021-summer"), date())
            .unwrap();
        assert_eq!(tag.as_str(), "2021-summer");
        assert_eq!(
            changelog.links["2021-summer"],
            "https://github.com/user/repo/compare/2021-spring..2021-summer"
        );
    }

    #[test]
    fn test_cut_release_existing_tag() {
        let mut changelog = changelog_with(&["Unreleased", "1.0.0"]);
        let before = changelog.clone();
        assert!(matches!(
            changelog.cut_release_on(None, Some("1.0.0"), date()),
            Err(ChangelogError::ReleaseExists(_))
        ));
        assert_eq!(changelog, before);
    }

    #[test]
    fn test_cut_release_without_link_format_leaves_changelog_untouched() {
        let mut changelog = changelog_with(&["Unreleased", "1.0.0"]);
        changelog.config.release_link_format = None;
        changelog
            .add_entry(ChangeType::Added, &["A feature"], false, None)
            .unwrap();
        let before = changelog.clone();

        let err = changelog.cut_release_on(None, None, date()).unwrap_err();
        assert_eq!(err.missing_field(), Some(ConfigField::ReleaseLinkFormat));
        assert_eq!(changelog, before);
        let order: Vec<&str> = changelog.releases.keys().map(ReleaseTag::as_str).collect();
        assert_eq!(order, vec!["Unreleased", "1.0.0"]);
    }

    #[test]
    fn test_cut_release_without_unreleased_section() {
        let mut changelog = changelog_with(&["0.1.0"]);
        let (tag, section) = changelog.cut_release_on(None, None, date()).unwrap();
        assert_eq!(tag.as_str(), "0.1.1");
        assert!(section.is_empty());
        let order: Vec<&str> = changelog.releases.keys().map(ReleaseTag::as_str).collect();
        assert_eq!(order, vec!["Unreleased", "0.1.1", "0.1.0"]);
    }
}
