//! Changelog parsing
//!
//! A single pass over the lines of the document. Each line is classified as
//! a release heading, change-type heading, list item, continuation, link
//! definition or blank line; anything before the first release heading is
//! header text.

mod state;

use std::str::FromStr;
use std::sync::LazyLock;

use kacl_core::config::DEFAULT_TAB_WIDTH;
use kacl_core::error::{ParseError, Result};
use kacl_core::types::{ChangeType, ConfigField};
use regex::Regex;
use tracing::{debug, instrument};

use crate::changelog::Changelog;
use crate::types::{Entry, ReleaseTag};
use state::ParserState;

/// `## [TAG]` with an optional ` - DATE`
static RELEASE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^## \[(?P<tag>.+)\]( +- +(?P<date>\d+-\d+-\d+))?").expect("Invalid regex")
});

/// `### Added` and friends
static CHANGE_TYPE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^### (?P<change_type>Security|Deprecated|Added|Changed|Removed|Fixed)$")
        .expect("Invalid regex")
});

/// A bulleted list item; the bullet glyph carries no meaning
static ENTRY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ *(\*|\+|-) (?P<text>.+)").expect("Invalid regex"));

/// `[name]: target`
static LINK_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[(?P<name>.+)\]: (?P<target>.+)$").expect("Invalid regex")
});

/// Parser options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Spaces a tab character expands to
    pub tab_width: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            tab_width: DEFAULT_TAB_WIDTH,
        }
    }
}

/// Parser for Keep a Changelog documents
#[derive(Debug, Clone, Default)]
pub struct Parser {
    options: ParseOptions,
}

impl Parser {
    /// Create a parser with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser with custom options
    pub fn with_options(options: ParseOptions) -> Self {
        Self { options }
    }

    /// Set the tab expansion width
    pub fn with_tab_width(mut self, tab_width: usize) -> Self {
        self.options.tab_width = tab_width;
        self
    }

    /// Parse changelog text into a validated document
    #[instrument(skip(self, text), fields(len = text.len()))]
    pub fn parse(&self, text: &str) -> Result<Changelog> {
        let text = text.replace('\t', &" ".repeat(self.options.tab_width));
        let mut state = ParserState::default();

        for (index, line) in text.lines().enumerate() {
            parse_line(&mut state, index, line)?;
        }
        state.flush();

        let mut changelog = state.changelog;
        changelog.header = changelog.header.trim().to_string();
        changelog.validate().map_err(ParseError::Invalid)?;

        debug!(
            releases = changelog.releases.len(),
            links = changelog.links.len(),
            "changelog parsed"
        );
        Ok(changelog)
    }
}

/// Parse changelog text with default options
pub fn loads(text: &str) -> Result<Changelog> {
    Parser::new().parse(text)
}

fn indentation(line: &str) -> usize {
    line.len() - line.trim_start().len()
}

fn parse_line(state: &mut ParserState, index: usize, line: &str) -> Result<()> {
    if let Some(caps) = RELEASE_REGEX.captures(line) {
        let tag = ReleaseTag::from(&caps["tag"]);
        let timestamp = caps.name("date").map(|m| m.as_str().to_string());
        state.start_release(tag, timestamp);
        return Ok(());
    }

    if state.release.is_none() {
        state.changelog.header.push('\n');
        state.changelog.header.push_str(line);
        return Ok(());
    }

    if let Some(caps) = CHANGE_TYPE_REGEX.captures(line) {
        let change_type = ChangeType::from_str(&caps["change_type"])?;
        state.start_change_type(change_type);
        return Ok(());
    }

    if let Some(caps) = ENTRY_REGEX.captures(line) {
        if state.change_type.is_none() {
            return Err(invalid_line(index, line));
        }
        let entry = Entry::new(&caps["text"]);
        return state
            .open_entry(entry, indentation(line))
            .map_err(|_| {
                ParseError::BadIndentation {
                    line: index,
                    text: line.to_string(),
                }
                .into()
            });
    }

    let blank = line.trim().is_empty();
    let link = LINK_REGEX.captures(line);

    if state.has_open_entry() && !blank && link.is_none() {
        let required = state.innermost_indentation().unwrap_or(0) + 2;
        if indentation(line) < required {
            return Err(ParseError::UnderIndented {
                line: index,
                text: line.to_string(),
            }
            .into());
        }
        state.continue_entry(line.trim_start());
        return Ok(());
    }

    if let Some(caps) = link {
        state.flush();
        let name = &caps["name"];
        let target = &caps["target"];
        match ConfigField::from_link_name(name) {
            Some(field) => state.changelog.config.set_encoded(field, target),
            None => {
                state
                    .changelog
                    .links
                    .insert(name.to_string(), target.to_string());
            }
        }
        return Ok(());
    }

    if blank || line.to_lowercase().contains("nothing here") {
        state.flush();
        return Ok(());
    }

    Err(invalid_line(index, line))
}

fn invalid_line(index: usize, line: &str) -> kacl_core::ChangelogError {
    ParseError::InvalidLine {
        line: index,
        text: line.to_string(),
    }
    .into()
}
