//! Error types for kacl

use thiserror::Error;

use crate::types::{BumpType, ConfigField};

/// Result type alias using ChangelogError
pub type Result<T> = std::result::Result<T, ChangelogError>;

/// Main error type for changelog operations
#[derive(Debug, Error)]
pub enum ChangelogError {
    /// The changelog text does not follow the grammar
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// An assembled changelog breaks the release/link invariant
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// An operation needs an embedded config field that is not set
    #[error("No config option for '{field}'")]
    MissingConfig { field: ConfigField },

    /// Version-related errors
    #[error(transparent)]
    Version(#[from] VersionError),

    /// Template-related errors
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// Settings file errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Change type outside the six Keep a Changelog keywords
    #[error("Unknown change type: {0}")]
    UnknownChangeType(String),

    /// Config key that does not name an embedded field
    #[error("{0} is not a valid config option")]
    UnknownConfigField(String),

    /// Entry added without any text
    #[error("An entry needs at least one line of text")]
    EmptyEntry,

    /// Release cut onto a tag that already has a section
    #[error("Release {0} already exists")]
    ReleaseExists(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ChangelogError {
    /// Create a missing-config error for a field
    pub fn missing_config(field: ConfigField) -> Self {
        Self::MissingConfig { field }
    }

    /// The config field a caller should ask the user for, if any
    pub fn missing_field(&self) -> Option<ConfigField> {
        match self {
            Self::MissingConfig { field } => Some(*field),
            _ => None,
        }
    }
}

/// Errors raised while parsing changelog text
///
/// Line numbers are zero-based.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Line matches no structural pattern
    #[error("Invalid changelog at line {line}: {text:?}")]
    InvalidLine { line: usize, text: String },

    /// List item indentation matches no open entry
    #[error("Bad indentation at line {line}: {text:?}")]
    BadIndentation { line: usize, text: String },

    /// Continuation line not indented past its entry
    #[error("Line {line} is not indented enough to be a continuation: {text:?}")]
    UnderIndented { line: usize, text: String },

    /// The parsed document failed validation
    #[error("Invalid changelog: {0}")]
    Invalid(#[from] ValidationError),
}

/// Release/link invariant violations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Document has no release sections at all
    #[error("Changelog contains no releases!")]
    NoReleases,

    /// Releases without a link definition, in release order
    #[error("The following releases are missing links: {}", .0.join(", "))]
    MissingLinks(Vec<String>),
}

/// Version-related errors
#[derive(Debug, Error)]
pub enum VersionError {
    /// Tag is not shaped like MAJOR.MINOR.PATCH
    #[error("Release tag {0} is not a semantic version")]
    NotSemantic(String),

    /// Tag looked semantic but a component did not fit
    #[error("Failed to parse version '{0}': {1}")]
    ParseFailed(String, String),

    /// Incrementing a component would exceed `u64::MAX`
    #[error("Cannot apply a {bump} bump to {version}: the {bump} component overflows")]
    Overflow { version: String, bump: BumpType },
}

/// Errors from parsing, formatting or reversing a template
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Placeholder name is not an identifier
    #[error("Unsupported field name {field:?} in format string {template:?}, only identifiers are supported")]
    InvalidField { template: String, field: String },

    /// Lone `{` or `}` outside a placeholder
    #[error("Single '{brace}' encountered in format string {template:?}")]
    UnbalancedBrace { template: String, brace: char },

    /// Input does not follow the template literals
    #[error("String {input:?} does not match format {template:?}")]
    NoMatch { input: String, template: String },

    /// Forward formatting without a value for a placeholder
    #[error("No value supplied for field {0:?}")]
    MissingValue(String),
}

/// Settings file errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid settings value
    #[error("Invalid configuration: {field} - {message}")]
    InvalidValue { field: String, message: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// IO error
    #[error("IO error reading settings: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_links_message_lists_tags() {
        let err = ValidationError::MissingLinks(vec!["Unreleased".into(), "0.1.0".into()]);
        assert_eq!(
            err.to_string(),
            "The following releases are missing links: Unreleased, 0.1.0"
        );
    }

    #[test]
    fn test_parse_error_messages() {
        let err = ParseError::UnderIndented {
            line: 7,
            text: "Some text".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Line 7 is not indented enough to be a continuation: \"Some text\""
        );

        let err = ParseError::BadIndentation {
            line: 3,
            text: " * x".to_string(),
        };
        assert!(err.to_string().starts_with("Bad indentation at line 3"));
    }

    #[test]
    fn test_missing_field_accessor() {
        let err = ChangelogError::missing_config(ConfigField::ReleaseLinkFormat);
        assert_eq!(err.missing_field(), Some(ConfigField::ReleaseLinkFormat));
        assert_eq!(err.to_string(), "No config option for 'release_link_format'");
        assert_eq!(ChangelogError::EmptyEntry.missing_field(), None);
    }

    #[test]
    fn test_overflow_message() {
        let err = VersionError::Overflow {
            version: "1.2.3".to_string(),
            bump: BumpType::Minor,
        };
        assert_eq!(
            err.to_string(),
            "Cannot apply a minor bump to 1.2.3: the minor component overflows"
        );
    }
}
