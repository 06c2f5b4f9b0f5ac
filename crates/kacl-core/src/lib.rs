//! kacl Core - Shared foundations for the kacl changelog toolkit
//!
//! This crate provides the error taxonomy, the closed domain enumerations
//! (change types, bump levels, embedded config fields), the template
//! formatting utility used for release links, and project settings loading.

pub mod config;
pub mod error;
pub mod template;
pub mod types;

pub use error::{
    ChangelogError, ConfigError, ParseError, Result, TemplateError, ValidationError, VersionError,
};
pub use template::{reverse_format, reverse_format_or, ReverseFormat, Template};
pub use types::{BumpType, ChangeType, ConfigField};
