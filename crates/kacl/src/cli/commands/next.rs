//! Next command

use clap::Args;
use tracing::info;

use super::changelog_file::ChangelogFile;
use super::release::BumpArg;
use crate::cli::{output, Cli, OutputFormat};

/// Show the tag the next release would get
#[derive(Debug, Args)]
pub struct NextCommand {
    /// Version bump to apply
    #[arg(long, value_enum, default_value_t = BumpArg::Auto)]
    pub bump: BumpArg,
}

impl NextCommand {
    /// Execute the next command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(bump = ?self.bump, "executing next command");
        let file = ChangelogFile::resolve(cli)?;
        let changelog = file.load()?;

        let next = changelog.next_tag(self.bump.forced())?;

        match cli.format {
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "current": changelog.latest_tag(),
                    "next": next,
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Text => {
                if cli.quiet {
                    println!("{}", next);
                } else {
                    let current = changelog
                        .latest_tag()
                        .map_or_else(|| "none".to_string(), |tag| tag.to_string());
                    println!("{}", output::key_value("Current", &current));
                    println!(
                        "{}",
                        output::key_value("Next", &output::tag_style().apply_to(&next).to_string())
                    );
                }
            }
        }
        Ok(())
    }
}
