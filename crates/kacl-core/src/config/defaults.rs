//! Default settings values

/// Default settings file name (TOML)
pub const DEFAULT_CONFIG_TOML: &str = "kacl.toml";

/// Default settings file name (YAML)
pub const DEFAULT_CONFIG_YAML: &str = "kacl.yaml";

/// Default changelog file, relative to the settings file or working directory
pub const DEFAULT_CHANGELOG_FILE: &str = "CHANGELOG.md";

/// Spaces per nesting level when rendering entries
pub const DEFAULT_INDENT: usize = 2;

/// Spaces a tab expands to when parsing
pub const DEFAULT_TAB_WIDTH: usize = 2;

/// Get list of settings file names to search for, in priority order
pub fn config_file_names() -> Vec<&'static str> {
    vec![
        DEFAULT_CONFIG_TOML,
        DEFAULT_CONFIG_YAML,
        ".kacl.toml",
        ".kacl.yaml",
    ]
}
