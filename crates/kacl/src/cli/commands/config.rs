//! Config command - read and change the config stored in the changelog

use clap::{Args, Subcommand};
use tracing::info;

use kacl_core::template::Template;
use kacl_core::types::ConfigField;
use kacl_core::ChangelogError;

use super::changelog_file::ChangelogFile;
use crate::cli::{output, Cli, OutputFormat};

/// Read or change the config stored in the changelog
#[derive(Debug, Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Print the value of a field
    Get {
        /// Field name (release_link_format, breaking_change_token)
        #[arg(value_parser = parse_field)]
        field: ConfigField,
    },

    /// Set a field; an empty value unsets it
    Set {
        /// Field name (release_link_format, breaking_change_token)
        #[arg(value_parser = parse_field)]
        field: ConfigField,

        /// New value
        value: String,
    },
}

fn parse_field(value: &str) -> Result<ConfigField, String> {
    value.parse().map_err(|e: ChangelogError| e.to_string())
}

impl ConfigCommand {
    /// Execute the config command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        let file = ChangelogFile::resolve(cli)?;
        let mut changelog = file.load()?;

        match &self.command {
            ConfigSubcommand::Get { field } => {
                info!(%field, "executing config get command");
                let value = changelog.config.get(*field)?;
                match cli.format {
                    OutputFormat::Json => {
                        let output = serde_json::json!({ field.as_str(): value });
                        println!("{}", serde_json::to_string_pretty(&output)?);
                    }
                    OutputFormat::Text => println!("{}", value),
                }
            }
            ConfigSubcommand::Set { field, value } => {
                info!(%field, "executing config set command");
                if *field == ConfigField::ReleaseLinkFormat {
                    Template::parse(value).map_err(ChangelogError::from)?;
                }
                changelog.config.set(*field, value.as_str());
                file.save(&changelog)?;

                if !cli.quiet {
                    output::success(&format!("Set {}", field));
                }
            }
        }
        Ok(())
    }
}
