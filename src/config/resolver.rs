//! Document + command line -> one validated configuration
//!
//! A resolver moves through `Loaded -> Validated -> Merged -> Finalized`; any
//! error leaves it failed and is returned to the caller.

use serde_json::{Map, Value};
use std::fmt;

use super::cli::CommandLineResolver;
use super::error::{ConfigError, MissingValues, PathError};
use super::merge::deep_merge;
use super::options::OptionDescriptor;
use super::path::{get_path, join_path};
use crate::render;

/// Top-level key holding the default values.
pub const DEFAULTS_KEY: &str = "defaults";
/// Top-level key holding the option descriptors.
pub const CLI_KEY: &str = "cli";

const DEFAULT_PROGRAM: &str = env!("CARGO_PKG_NAME");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Loaded,
    Validated,
    Merged,
    Finalized,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Loaded => "loaded",
            Stage::Validated => "validated",
            Stage::Merged => "merged",
            Stage::Finalized => "finalized",
        };
        f.write_str(name)
    }
}

/// A raw document whose required sections have been checked.
#[derive(Debug, Clone)]
pub struct ConfigResolver {
    raw: Value,
    defaults: Map<String, Value>,
    descriptors: Vec<OptionDescriptor>,
    program: String,
}

impl ConfigResolver {
    /// Check that `raw` has a `defaults` mapping and a `cli` sequence.
    pub fn new(raw: Value) -> Result<Self, ConfigError> {
        tracing::debug!(stage = %Stage::Loaded, "checking document sections");

        let Value::Object(root) = &raw else {
            return Err(ConfigError::syntax("document root must be a mapping"));
        };
        for key in [DEFAULTS_KEY, CLI_KEY] {
            if !root.contains_key(key) {
                return Err(ConfigError::syntax(format!("missing required section '{}'", key)));
            }
        }

        let defaults = match &root[DEFAULTS_KEY] {
            Value::Object(defaults) => defaults.clone(),
            _ => return Err(ConfigError::syntax("'defaults' must be a mapping")),
        };
        let descriptors = OptionDescriptor::parse_section(&root[CLI_KEY])?;

        tracing::debug!(
            stage = %Stage::Validated,
            defaults = defaults.len(),
            options = descriptors.len(),
            "document sections valid"
        );

        Ok(Self { raw, defaults, descriptors, program: DEFAULT_PROGRAM.to_string() })
    }

    /// Name shown in the usage text of the document-declared flags.
    pub fn program_name(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn raw(&self) -> &Value {
        &self.raw
    }

    pub fn defaults(&self) -> &Map<String, Value> {
        &self.defaults
    }

    pub fn descriptors(&self) -> &[OptionDescriptor] {
        &self.descriptors
    }

    /// Parse `args` (without the program name), merge them over the defaults
    /// and check that every leaf ends up set.
    pub fn resolve<I, T>(&self, args: I) -> Result<ResolvedConfig, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let mut cli = CommandLineResolver::new(self.program.clone(), self.descriptors.clone())?;
        let options = cli.parse_from(args)?.clone();

        let mut values = self.defaults.clone();
        deep_merge(&mut values, options.clone());
        tracing::debug!(
            stage = %Stage::Merged,
            supplied = options.len(),
            "merged command line over defaults"
        );

        let missing = unset_leaves(&values);
        if !missing.is_empty() {
            tracing::debug!(missing = ?missing, "configuration incomplete");
            return Err(ConfigError::Missing(MissingValues { paths: missing, usage: cli.usage() }));
        }

        tracing::debug!(stage = %Stage::Finalized, "configuration complete");
        Ok(ResolvedConfig {
            values,
            options,
            operands: cli.operands().to_vec(),
            usage: cli.usage(),
        })
    }
}

/// A merged configuration with every leaf set.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    values: Map<String, Value>,
    options: Map<String, Value>,
    operands: Vec<String>,
    usage: String,
}

impl ResolvedConfig {
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.values
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.values
    }

    pub fn get<S: AsRef<str>>(&self, path: &[S]) -> Result<&Value, PathError> {
        get_path(&self.values, path)
    }

    /// Values taken from the command line, before merging.
    pub fn options(&self) -> &Map<String, Value> {
        &self.options
    }

    pub fn operands(&self) -> &[String] {
        &self.operands
    }

    pub fn usage(&self) -> &str {
        &self.usage
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        render::render_json(&self.values)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        render::render_json_pretty(&self.values)
    }

    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        render::render_yaml(&self.values)
    }
}

/// Whether a leaf counts as configured. Null, `false`, `""` and `[]` do not.
pub fn is_set(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Number(_) | Value::Object(_) => true,
    }
}

/// Dotted paths of every unset leaf, walking nested mappings.
pub fn unset_leaves(values: &Map<String, Value>) -> Vec<String> {
    let mut missing = Vec::new();
    collect_unset(values, &mut Vec::new(), &mut missing);
    missing
}

fn collect_unset<'a>(map: &'a Map<String, Value>, prefix: &mut Vec<&'a str>, out: &mut Vec<String>) {
    for (key, value) in map {
        prefix.push(key);
        match value {
            Value::Object(child) => collect_unset(child, prefix, out),
            leaf if !is_set(leaf) => out.push(join_path(prefix.as_slice())),
            _ => {}
        }
        prefix.pop();
    }
}
