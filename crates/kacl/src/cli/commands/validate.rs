//! Validate command

use clap::Args;
use tracing::info;

use super::changelog_file::ChangelogFile;
use crate::cli::{output, Cli, OutputFormat};

/// Check that the changelog is well formed
#[derive(Debug, Args)]
pub struct ValidateCommand {}

impl ValidateCommand {
    /// Execute the validate command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!("executing validate command");
        let file = ChangelogFile::resolve(cli)?;
        let changelog = file.load()?;

        match cli.format {
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "valid": true,
                    "path": file.path.display().to_string(),
                    "releases": changelog.releases.len(),
                    "latest": changelog.latest_tag(),
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Text => {
                if !cli.quiet {
                    output::success(&format!(
                        "{} is valid",
                        output::path_style().apply_to(file.path.display())
                    ));
                    println!(
                        "{}",
                        output::key_value("Releases", &changelog.releases.len().to_string())
                    );
                    if let Some(latest) = changelog.latest_tag() {
                        println!("{}", output::key_value("Latest", latest.as_str()));
                    }
                }
            }
        }

        Ok(())
    }
}
