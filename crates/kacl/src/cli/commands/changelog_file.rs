//! Locating, loading and saving the changelog a command works on

use std::path::PathBuf;

use anyhow::Context;
use tracing::debug;

use kacl_changelog::{dump_to_file, load_from_file, Changelog, Parser, Renderer};
use kacl_core::config::{changelog_path, load_config_or_default};
use kacl_core::ChangelogError;

use crate::cli::{output, Cli};

/// The changelog file and the settings used to read and write it
#[derive(Debug)]
pub struct ChangelogFile {
    pub path: PathBuf,
    parser: Parser,
    renderer: Renderer,
}

impl ChangelogFile {
    /// Resolve the changelog from `--path`, the settings file, or the default name
    ///
    /// Settings are searched from the changelog's directory when `--path` is
    /// given, otherwise from the working directory.
    pub fn resolve(cli: &Cli) -> anyhow::Result<Self> {
        let cwd = std::env::current_dir()?;
        let explicit = cli.path.as_ref().map(|path| cwd.join(path));
        let settings_dir = explicit
            .as_deref()
            .and_then(|path| path.parent())
            .unwrap_or(cwd.as_path())
            .to_path_buf();

        let (config, config_path) = load_config_or_default(&settings_dir)?;
        let path = explicit
            .unwrap_or_else(|| changelog_path(&config, config_path.as_deref(), &cwd));

        debug!(
            path = %path.display(),
            settings = ?config_path,
            indent = config.changelog.indent,
            tab_width = config.changelog.tab_width,
            "resolved changelog"
        );

        Ok(Self {
            path,
            parser: Parser::new().with_tab_width(config.changelog.tab_width),
            renderer: Renderer::with_indent(config.changelog.indent),
        })
    }

    /// Read and parse the changelog
    pub fn load(&self) -> anyhow::Result<Changelog> {
        load_from_file(&self.path, &self.parser)
            .with_context(|| format!("Failed to load {}", self.path.display()))
    }

    /// Render and write the changelog
    pub fn save(&self, changelog: &Changelog) -> anyhow::Result<()> {
        dump_to_file(changelog, &self.path, &self.renderer)
            .with_context(|| format!("Failed to write {}", self.path.display()))
    }

    /// Canonical text of the changelog with the configured indent
    pub fn render(&self, changelog: &Changelog) -> anyhow::Result<String> {
        Ok(self.renderer.render(changelog)?)
    }

    /// Tell the user how to fix a missing config field
    pub fn hint_missing_config(&self, cli: &Cli, err: ChangelogError) -> anyhow::Error {
        if let Some(field) = err.missing_field() {
            if !cli.quiet {
                output::hint(&format!(
                    "Set it with: kacl --path {} config set {} VALUE",
                    self.path.display(),
                    field
                ));
            }
        }
        err.into()
    }
}
