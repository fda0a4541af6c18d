//! Document loading

use serde_json::{Map, Number, Value};
use std::fs;
use std::path::Path;

use super::error::ConfigError;
use super::resolver::ConfigResolver;

/// Serialization format of a document on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Yaml,
    Json,
    Toml,
}

impl DocumentFormat {
    /// Pick the format from the file extension. YAML also reads JSON, so it is
    /// the fallback for unknown or missing extensions.
    pub fn from_path(path: &Path) -> Self {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("").to_ascii_lowercase();
        match ext.as_str() {
            "json" => Self::Json,
            "toml" => Self::Toml,
            _ => Self::Yaml,
        }
    }
}

/// Read and parse the document at `path` without checking its sections.
pub fn load_document(path: &Path) -> Result<Value, ConfigError> {
    let content = fs::read_to_string(path)
        .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;

    let format = DocumentFormat::from_path(path);
    tracing::info!("Loading {:?} document {}", format, path.display());
    parse_document(&content, format)
        .map_err(|reason| ConfigError::syntax(format!("{}: {}", path.display(), reason)))
}

/// Load the document at `path` and check its required sections.
pub fn load_resolver(path: &Path) -> Result<ConfigResolver, ConfigError> {
    ConfigResolver::new(load_document(path)?)
}

pub fn parse_document(content: &str, format: DocumentFormat) -> Result<Value, String> {
    match format {
        DocumentFormat::Yaml => {
            serde_yaml::from_str(content).map_err(|e| format!("invalid YAML: {}", e))
        }
        DocumentFormat::Json => {
            serde_json::from_str(content).map_err(|e| format!("invalid JSON: {}", e))
        }
        DocumentFormat::Toml => {
            let value = toml::from_str::<toml::Value>(content)
                .map_err(|e| format!("invalid TOML: {}", e))?;
            toml_to_json(value, &mut Vec::new())
        }
    }
}

/// Convert a TOML value, tracking the key path for error messages. JSON has no
/// `inf` or `nan`, so those floats are rejected.
fn toml_to_json(value: toml::Value, path: &mut Vec<String>) -> Result<Value, String> {
    Ok(match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Number(i.into()),
        toml::Value::Float(f) => match Number::from_f64(f) {
            Some(number) => Value::Number(number),
            None => return Err(format!("value {} at '{}' is not a finite number", f, path.join("."))),
        },
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Array(
            items.into_iter().map(|item| toml_to_json(item, path)).collect::<Result<_, _>>()?,
        ),
        toml::Value::Table(table) => {
            let mut map = Map::new();
            for (key, child) in table {
                path.push(key.clone());
                let converted = toml_to_json(child, path)?;
                path.pop();
                map.insert(key, converted);
            }
            Value::Object(map)
        }
    })
}
