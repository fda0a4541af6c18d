//! Error types for document loading and configuration resolution

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failures of the nested path walker.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("cannot address a value with an empty key path")]
    EmptyPath,

    #[error("key not found: {0}")]
    KeyNotFound(String),

    /// An intermediate key holds a scalar or sequence where a mapping is needed.
    #[error("value at '{0}' is not a mapping")]
    NotAMapping(String),
}

/// Any failure while turning a document and an argument list into a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document is missing a required section or a section has the wrong shape.
    #[error("config file syntax error: {0}")]
    Syntax(String),

    /// The argument list was rejected by the flag parser.
    #[error(transparent)]
    Parse(#[from] clap::Error),

    #[error("failed reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot assign option value: {0}")]
    Path(#[from] PathError),

    #[error("option {flag} cannot be coerced: {reason}")]
    Coercion { flag: String, reason: String },

    /// The merged configuration still has unset leaves.
    #[error("{0}")]
    Missing(MissingValues),
}

impl ConfigError {
    pub(crate) fn syntax(message: impl Into<String>) -> Self {
        Self::Syntax(message.into())
    }
}

/// Payload of a failed completeness check: every unset leaf plus the usage
/// text of the document-declared flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingValues {
    /// Dotted key paths, in merged-mapping order.
    pub paths: Vec<String>,
    pub usage: String,
}

impl fmt::Display for MissingValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, path) in self.paths.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "required variable not set: {}", path)?;
        }
        Ok(())
    }
}
