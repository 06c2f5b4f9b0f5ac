//! CLI commands

mod changelog_file;
mod completions;
mod config;
mod entry;
mod fmt;
mod init;
mod next;
mod release;
mod validate;

pub use completions::CompletionsCommand;
pub use config::ConfigCommand;
pub use entry::EntryCommand;
pub use fmt::FmtCommand;
pub use init::InitCommand;
pub use next::NextCommand;
pub use release::ReleaseCommand;
pub use validate::ValidateCommand;
