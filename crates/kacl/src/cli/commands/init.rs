//! Init command

use clap::Args;
use console::{style, Term};
use dialoguer::{Confirm, Input};
use tracing::info;

use kacl_changelog::config::DEFAULT_BREAKING_CHANGE_TOKEN;
use kacl_changelog::Changelog;
use kacl_core::template::Template;

use super::changelog_file::ChangelogFile;
use crate::cli::{output, Cli};

/// Create a new changelog
#[derive(Debug, Args)]
pub struct InitCommand {
    /// Force overwrite an existing changelog
    #[arg(short, long)]
    pub force: bool,

    /// Template for release links, e.g. https://github.com/user/repo/compare/{previous_tag}..{tag}
    #[arg(long)]
    pub release_link_format: Option<String>,

    /// Token marking breaking changes
    #[arg(long, default_value = DEFAULT_BREAKING_CHANGE_TOKEN)]
    pub breaking_change_token: String,
}

impl InitCommand {
    /// Execute the init command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(force = self.force, "executing init command");
        let file = ChangelogFile::resolve(cli)?;

        if file.path.exists() && !self.force {
            if !Term::stdout().is_term() {
                anyhow::bail!(
                    "Changelog already exists at {}. Use --force to overwrite.",
                    file.path.display()
                );
            }

            let overwrite = Confirm::new()
                .with_prompt(format!(
                    "Changelog already exists at {}. Overwrite?",
                    file.path.display()
                ))
                .default(false)
                .interact()?;

            if !overwrite {
                println!("{}", style("Aborted.").yellow());
                return Ok(());
            }
        }

        let release_link_format = match &self.release_link_format {
            Some(format) => format.clone(),
            None => Input::<String>::new()
                .with_prompt("Release link format")
                .validate_with(|input: &String| {
                    Template::parse(input).map(|_| ()).map_err(|e| e.to_string())
                })
                .interact_text()?,
        };

        let changelog = Changelog::initial(&release_link_format, &self.breaking_change_token)?;
        file.save(&changelog)?;

        if !cli.quiet {
            output::success(&format!(
                "Created changelog at {}",
                output::path_style().apply_to(file.path.display())
            ));
        }

        Ok(())
    }
}
