//! Entry command

use clap::Args;
use tracing::info;

use kacl_core::types::ChangeType;

use super::changelog_file::ChangelogFile;
use crate::cli::{output, Cli, OutputFormat};

/// Add an entry to the changelog
#[derive(Debug, Args)]
pub struct EntryCommand {
    /// Kind of change (added, changed, deprecated, removed, fixed, security)
    #[arg(value_parser = parse_change_type)]
    pub change_type: ChangeType,

    /// Entry text; repeat to add nested notes under the first message
    #[arg(short, long = "message", required = true)]
    pub messages: Vec<String>,

    /// Mark the entry as a breaking change
    #[arg(short, long)]
    pub breaking: bool,

    /// Add to this release instead of Unreleased
    #[arg(short, long)]
    pub tag: Option<String>,
}

fn parse_change_type(value: &str) -> Result<ChangeType, String> {
    value.parse().map_err(|e: kacl_core::ChangelogError| e.to_string())
}

impl EntryCommand {
    /// Execute the entry command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(
            change_type = %self.change_type,
            breaking = self.breaking,
            tag = ?self.tag,
            "executing entry command"
        );
        let file = ChangelogFile::resolve(cli)?;
        let mut changelog = file.load()?;

        changelog
            .add_entry(
                self.change_type,
                self.messages.as_slice(),
                self.breaking,
                self.tag.as_deref(),
            )
            .map_err(|e| file.hint_missing_config(cli, e))?;
        file.save(&changelog)?;

        match cli.format {
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "change_type": self.change_type,
                    "tag": self.tag.as_deref().unwrap_or(kacl_changelog::UNRELEASED),
                    "messages": self.messages,
                    "breaking": self.breaking,
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Text => {
                if !cli.quiet {
                    output::success(&format!("Added {} entry", self.change_type));
                }
            }
        }
        Ok(())
    }
}
