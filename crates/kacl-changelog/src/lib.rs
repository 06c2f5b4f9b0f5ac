//! kacl Changelog - Keep a Changelog documents
//!
//! This crate provides the changelog document model, a line-oriented parser
//! and its inverse renderer, and the release-cutting and version-inference
//! operations built on them.

pub mod changelog;
pub mod config;
pub mod defaults;
pub mod parser;
pub mod renderer;
pub mod types;

use std::path::Path;

use kacl_core::error::Result;
use tracing::info;

pub use changelog::Changelog;
pub use config::ChangelogConfig;
pub use parser::{loads, ParseOptions, Parser};
pub use renderer::{dumps, Renderer};
pub use types::{Entry, ReleaseSection, ReleaseTag, UNRELEASED};

/// Read and parse a changelog file
pub fn load_from_file(path: &Path, parser: &Parser) -> Result<Changelog> {
    let text = std::fs::read_to_string(path)?;
    let changelog = parser.parse(&text)?;
    info!(path = %path.display(), releases = changelog.releases.len(), "loaded changelog");
    Ok(changelog)
}

/// Render a changelog and write it to a file
///
/// Nothing is written if the changelog fails validation.
pub fn dump_to_file(changelog: &Changelog, path: &Path, renderer: &Renderer) -> Result<()> {
    let text = renderer.render(changelog)?;
    std::fs::write(path, text)?;
    info!(path = %path.display(), "wrote changelog");
    Ok(())
}
