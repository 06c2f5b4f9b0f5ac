//! Project settings for kacl
//!
//! Settings live outside the changelog (in `kacl.toml` or `kacl.yaml`) and
//! only tune how the file is located, parsed and rendered. Fields that
//! describe the changelog itself are embedded in the changelog.

pub mod defaults;
mod loader;
mod types;
pub mod validation;

pub use defaults::*;
pub use loader::*;
pub use types::*;
pub use validation::*;
