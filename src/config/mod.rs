//! Configuration loading and merging
//!
//! Resolves one configuration from a document's `defaults` section and the
//! flags its `cli` section declares, with proper precedence (CLI > Defaults).

pub mod cli;
pub mod error;
pub mod loader;
pub mod merge;
pub mod options;
pub mod path;
pub mod resolver;

pub use cli::CommandLineResolver;
pub use error::{ConfigError, MissingValues, PathError};
pub use loader::{load_document, load_resolver, DocumentFormat};
pub use merge::deep_merge;
pub use options::{FlagSpec, OptionDescriptor, ValueType};
pub use path::{get_path, has_path, set_path};
pub use resolver::{ConfigResolver, ResolvedConfig, Stage};
