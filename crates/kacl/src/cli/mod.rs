//! CLI definition and command handling

pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::{
    CompletionsCommand, ConfigCommand, EntryCommand, FmtCommand, InitCommand, NextCommand,
    ReleaseCommand, ValidateCommand,
};

/// kacl - Keep a Changelog command-line tool
#[derive(Debug, Parser)]
#[command(name = "kacl")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the changelog file
    #[arg(short, long, global = true, env = "CHANGELOG_PATH")]
    pub path: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Working directory
    #[arg(short = 'C', long, global = true)]
    pub directory: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for CLI
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output
    Json,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a new changelog
    Init(InitCommand),

    /// Check that the changelog is well formed
    Validate(ValidateCommand),

    /// Rewrite the changelog in canonical form
    Fmt(FmtCommand),

    /// Add an entry to the changelog
    Entry(EntryCommand),

    /// Move unreleased changes into a new release
    Release(ReleaseCommand),

    /// Show the tag the next release would get
    Next(NextCommand),

    /// Read or change the config stored in the changelog
    Config(ConfigCommand),

    /// Generate shell completions
    Completions(CompletionsCommand),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> anyhow::Result<()> {
        // Change to specified directory if provided
        if let Some(dir) = &self.directory {
            std::env::set_current_dir(dir)?;
        }

        match self.command {
            Commands::Init(ref cmd) => cmd.execute(&self),
            Commands::Validate(ref cmd) => cmd.execute(&self),
            Commands::Fmt(ref cmd) => cmd.execute(&self),
            Commands::Entry(ref cmd) => cmd.execute(&self),
            Commands::Release(ref cmd) => cmd.execute(&self),
            Commands::Next(ref cmd) => cmd.execute(&self),
            Commands::Config(ref cmd) => cmd.execute(&self),
            Commands::Completions(ref cmd) => cmd.execute(&self),
        }
    }
}
