//! Settings validation

use tracing::debug;

use crate::error::{ConfigError, Result};

use super::types::Config;

const WIDTH_RANGE: std::ops::RangeInclusive<usize> = 1..=8;

/// Validate settings
pub fn validate_config(config: &Config) -> Result<()> {
    debug!("validating settings");

    if config.changelog.file.as_os_str().is_empty() {
        return Err(ConfigError::InvalidValue {
            field: "changelog.file".to_string(),
            message: "file cannot be empty".to_string(),
        }
        .into());
    }

    for (field, value) in [
        ("changelog.indent", config.changelog.indent),
        ("changelog.tab_width", config.changelog.tab_width),
    ] {
        if !WIDTH_RANGE.contains(&value) {
            return Err(ConfigError::InvalidValue {
                field: field.to_string(),
                message: format!(
                    "must be between {} and {}",
                    WIDTH_RANGE.start(),
                    WIDTH_RANGE.end()
                ),
            }
            .into());
        }
    }

    debug!("settings validation passed");
    Ok(())
}
