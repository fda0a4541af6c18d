//! layerconf: resolve one configuration from layered sources
//!
//! A document carries a `defaults` mapping and a `cli` list of option
//! descriptors. The descriptors become command-line flags; supplied flag values
//! are merged over the defaults and the result must have every leaf set.

pub mod config;
pub mod render;

pub use config::{
    deep_merge, load_document, load_resolver, CommandLineResolver, ConfigError, ConfigResolver,
    MissingValues, OptionDescriptor, ResolvedConfig, ValueType,
};
