//! Fmt command - Rewrite the changelog in canonical form

use clap::Args;
use tracing::info;

use super::changelog_file::ChangelogFile;
use crate::cli::{output, Cli};

/// Rewrite the changelog in canonical form
#[derive(Debug, Args)]
pub struct FmtCommand {
    /// Verify formatting without applying changes (for CI / hooks)
    #[arg(long)]
    pub check: bool,
}

impl FmtCommand {
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(check = self.check, "executing fmt command");
        let file = ChangelogFile::resolve(cli)?;
        let changelog = file.load()?;

        let current = std::fs::read_to_string(&file.path)?;
        let canonical = file.render(&changelog)?;
        if current == canonical {
            if !cli.quiet {
                output::success("Changelog is already formatted");
            }
            return Ok(());
        }

        if self.check {
            anyhow::bail!("{} is not formatted", file.path.display());
        }

        file.save(&changelog)?;
        if !cli.quiet {
            output::success(&format!(
                "Formatted {}",
                output::path_style().apply_to(file.path.display())
            ));
        }
        Ok(())
    }
}
