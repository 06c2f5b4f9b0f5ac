//! Shell completions

use std::path::PathBuf;

use clap::{Args, CommandFactory};
use clap_complete::{generate, Shell};
use tracing::info;

use crate::cli::{output, Cli};

const BIN_NAME: &str = "kacl";

/// Generate shell completions
#[derive(Debug, Args)]
pub struct CompletionsCommand {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,

    /// Write to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl CompletionsCommand {
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(shell = %self.shell, "executing completions command");
        let mut cmd = Cli::command();

        let Some(path) = &self.output else {
            generate(self.shell, &mut cmd, BIN_NAME, &mut std::io::stdout());
            return Ok(());
        };

        let mut file = std::fs::File::create(path)?;
        generate(self.shell, &mut cmd, BIN_NAME, &mut file);
        if !cli.quiet {
            output::success(&format!(
                "Completions written to {}",
                output::path_style().apply_to(path.display())
            ));
        }
        Ok(())
    }
}
