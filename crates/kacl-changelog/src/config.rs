//! Config embedded in the changelog
//!
//! Stored on disk as underscore-prefixed link definitions at the end of the
//! file, e.g. `[_breaking_change_token]: BREAKING`.

use std::borrow::Cow;

use kacl_core::error::{ChangelogError, Result};
use kacl_core::types::ConfigField;
use percent_encoding::percent_decode_str;
use serde::Serialize;
use url::form_urlencoded;

/// Default marker for breaking entries
pub const DEFAULT_BREAKING_CHANGE_TOKEN: &str = "BREAKING";

/// Config carried inside a changelog document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangelogConfig {
    /// Template for release comparison links
    pub release_link_format: Option<String>,
    /// Marker prefixed to breaking entries
    pub breaking_change_token: Option<String>,
}

impl Default for ChangelogConfig {
    fn default() -> Self {
        Self {
            release_link_format: None,
            breaking_change_token: Some(DEFAULT_BREAKING_CHANGE_TOKEN.to_string()),
        }
    }
}

impl ChangelogConfig {
    /// The raw value of a field; empty values count as unset
    pub fn value(&self, field: ConfigField) -> Option<&str> {
        let value = match field {
            ConfigField::ReleaseLinkFormat => self.release_link_format.as_deref(),
            ConfigField::BreakingChangeToken => self.breaking_change_token.as_deref(),
        };
        value.filter(|v| !v.is_empty())
    }

    /// The value of a field, failing if it is not set
    pub fn get(&self, field: ConfigField) -> Result<&str> {
        self.value(field)
            .ok_or_else(|| ChangelogError::missing_config(field))
    }

    /// The value of a field, or `default` if it is not set
    pub fn get_or<'a>(&'a self, field: ConfigField, default: &'a str) -> &'a str {
        self.value(field).unwrap_or(default)
    }

    /// Set a field
    pub fn set(&mut self, field: ConfigField, value: impl Into<String>) {
        let slot = match field {
            ConfigField::ReleaseLinkFormat => &mut self.release_link_format,
            ConfigField::BreakingChangeToken => &mut self.breaking_change_token,
        };
        *slot = Some(value.into());
    }

    /// Set a field from its on-disk (encoded) representation
    pub fn set_encoded(&mut self, field: ConfigField, encoded: &str) {
        self.set(field, decode_value(field, encoded));
    }

    /// Set fields with their on-disk representation, in rendering order
    pub fn encoded_fields(&self) -> Vec<(ConfigField, Cow<'_, str>)> {
        ConfigField::ALL
            .into_iter()
            .filter_map(|field| {
                self.value(field)
                    .map(|value| (field, encode_value(field, value)))
            })
            .collect()
    }
}

/// Transform a field value for writing
fn encode_value(field: ConfigField, value: &str) -> Cow<'_, str> {
    match field {
        ConfigField::ReleaseLinkFormat => Cow::Borrowed(value),
        ConfigField::BreakingChangeToken => {
            Cow::Owned(form_urlencoded::byte_serialize(value.as_bytes()).collect())
        }
    }
}

/// Inverse of [`encode_value`]
///
/// The whole value is decoded as one string; raw `=` and `&` are kept.
fn decode_value(field: ConfigField, encoded: &str) -> String {
    match field {
        ConfigField::ReleaseLinkFormat => encoded.to_string(),
        ConfigField::BreakingChangeToken => percent_decode_str(&encoded.replace('+', " "))
            .decode_utf8_lossy()
            .into_owned(),
    }
}
