//! Release command

use clap::{Args, ValueEnum};
use console::style;
use tracing::info;

use kacl_core::types::BumpType;

use super::changelog_file::ChangelogFile;
use crate::cli::{output, Cli, OutputFormat};

/// How far to bump the version
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum BumpArg {
    /// Infer from the unreleased entries
    #[default]
    Auto,
    /// Breaking release
    Major,
    /// Feature release
    Minor,
    /// Fix release
    Patch,
}

impl BumpArg {
    /// The forced bump, if any
    pub fn forced(self) -> Option<BumpType> {
        match self {
            BumpArg::Auto => None,
            BumpArg::Major => Some(BumpType::Major),
            BumpArg::Minor => Some(BumpType::Minor),
            BumpArg::Patch => Some(BumpType::Patch),
        }
    }
}

/// Move unreleased changes into a new release
#[derive(Debug, Args)]
pub struct ReleaseCommand {
    /// Version bump to apply
    #[arg(long, value_enum, default_value_t = BumpArg::Auto)]
    pub bump: BumpArg,

    /// Release under this tag instead of computing one
    #[arg(short, long, conflicts_with = "bump")]
    pub tag: Option<String>,
}

impl ReleaseCommand {
    /// Execute the release command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(bump = ?self.bump, tag = ?self.tag, "executing release command");
        let file = ChangelogFile::resolve(cli)?;
        let mut changelog = file.load()?;

        let (tag, section) = changelog
            .cut_release(self.bump.forced(), self.tag.as_deref())
            .map_err(|e| file.hint_missing_config(cli, e))?;
        file.save(&changelog)?;

        match cli.format {
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "tag": tag,
                    "date": section.timestamp,
                    "entries": section.entries,
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Text => {
                if cli.quiet {
                    println!("{}", tag);
                } else {
                    let count: usize = section.entries.values().map(Vec::len).sum();
                    output::success(&format!(
                        "Released {} with {} {}",
                        output::tag_style().apply_to(&tag),
                        count,
                        if count == 1 { "entry" } else { "entries" }
                    ));
                    if section.is_empty() {
                        println!("{}", style("  (no unreleased changes)").dim());
                    }
                }
            }
        }

        Ok(())
    }
}
