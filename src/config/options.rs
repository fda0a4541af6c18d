//! Option descriptors declared in a document's `cli` section

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::ConfigError;
use super::path::join_path;

/// How a supplied flag value is turned into a configuration value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValueType {
    /// Keep the raw string.
    #[default]
    String,
    /// Treat the raw string as a file path and use the file's text.
    FileContents,
    /// Parse the raw string as a number, best effort.
    Float,
}

/// One entry of the `cli` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionDescriptor {
    /// Flag declaration, e.g. `-n, --name NAME`.
    #[serde(rename = "cli_key")]
    pub flag_spec: String,

    /// Where the resolved value is written in the output mapping.
    #[serde(rename = "keys")]
    pub target_path: Vec<String>,

    #[serde(rename = "type", default)]
    pub value_type: ValueType,

    #[serde(rename = "desc", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl OptionDescriptor {
    pub fn new(flag_spec: impl Into<String>, target_path: &[&str]) -> Self {
        Self {
            flag_spec: flag_spec.into(),
            target_path: target_path.iter().map(|k| (*k).to_string()).collect(),
            value_type: ValueType::String,
            description: None,
        }
    }

    pub fn value_type(mut self, value_type: ValueType) -> Self {
        self.value_type = value_type;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Decode the `cli` section of a raw document.
    pub fn parse_section(section: &Value) -> Result<Vec<Self>, ConfigError> {
        let Value::Array(entries) = section else {
            return Err(ConfigError::syntax("'cli' must be a sequence of option descriptors"));
        };

        entries
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                let descriptor: Self = serde_json::from_value(entry.clone()).map_err(|e| {
                    ConfigError::syntax(format!("cli entry {} is not an option descriptor: {}", index, e))
                })?;
                if descriptor.target_path.is_empty() {
                    return Err(ConfigError::syntax(format!(
                        "cli entry {} ({}) has an empty 'keys' list",
                        index, descriptor.flag_spec
                    )));
                }
                Ok(descriptor)
            })
            .collect()
    }
}

/// The pieces of a flag declaration that the argument parser needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagSpec {
    pub short: Option<char>,
    pub long: Option<String>,
    pub value_name: String,
}

impl FlagSpec {
    /// Split a declaration such as `-r, --rate RATE` or `--cert=FILE`.
    ///
    /// Without a placeholder the value name falls back to the upper-cased last
    /// key of `target_path`.
    pub fn parse(spec: &str, target_path: &[String]) -> Result<Self, ConfigError> {
        let mut short = None;
        let mut long = None;
        let mut value_name = None;

        let tokens = spec.split(|c: char| c.is_whitespace() || c == ',').filter(|t| !t.is_empty());
        for token in tokens {
            if let Some(rest) = token.strip_prefix("--") {
                let (name, placeholder) = match rest.split_once('=') {
                    Some((name, placeholder)) => (name, Some(placeholder)),
                    None => (rest, None),
                };
                if !is_valid_long(name) {
                    return Err(invalid_spec(spec, format!("'--{}' is not a valid long flag", name)));
                }
                if long.replace(name.to_string()).is_some() {
                    return Err(invalid_spec(spec, "more than one long flag"));
                }
                if let Some(placeholder) = placeholder.filter(|p| !p.is_empty()) {
                    value_name = Some(placeholder.to_string());
                }
            } else if let Some(rest) = token.strip_prefix('-') {
                let mut chars = rest.chars();
                let flag = chars
                    .next()
                    .filter(|c| c.is_alphanumeric())
                    .ok_or_else(|| invalid_spec(spec, format!("'{}' is not a valid short flag", token)))?;
                if short.replace(flag).is_some() {
                    return Err(invalid_spec(spec, "more than one short flag"));
                }
                let attached = chars.as_str();
                if !attached.is_empty() {
                    value_name = Some(attached.to_string());
                }
            } else {
                value_name = Some(token.to_string());
            }
        }

        if short.is_none() && long.is_none() {
            return Err(invalid_spec(spec, "no flag name declared"));
        }

        let value_name = value_name.unwrap_or_else(|| {
            target_path.last().map(|k| k.to_uppercase()).unwrap_or_else(|| "VALUE".to_string())
        });

        Ok(Self { short, long, value_name })
    }

    /// How the flag is spelled in messages: the long form when there is one.
    pub fn display_name(&self) -> String {
        match (&self.long, self.short) {
            (Some(long), _) => format!("--{}", long),
            (None, Some(short)) => format!("-{}", short),
            (None, None) => String::new(),
        }
    }
}

fn is_valid_long(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_alphanumeric())
        && chars.all(|c| c.is_alphanumeric() || c == '-' || c == '_')
}

fn invalid_spec(spec: &str, reason: impl std::fmt::Display) -> ConfigError {
    ConfigError::syntax(format!("invalid cli_key '{}': {}", spec, reason))
}

/// Read the longest numeric prefix of `raw` as a float.
///
/// Leading whitespace, a sign, digits (single underscores allowed between
/// digits), a fraction and an exponent are accepted. Input without a numeric
/// prefix reads as `0.0`.
pub fn parse_float_lenient(raw: &str) -> f64 {
    let bytes = raw.trim_start().as_bytes();
    let mut out = String::with_capacity(bytes.len());
    let mut i = 0;

    if let Some(&(sign @ (b'+' | b'-'))) = bytes.first() {
        out.push(sign as char);
        i += 1;
    }

    let int_digits = take_digits(bytes, &mut i, &mut out);

    let mut frac_digits = 0;
    if bytes.get(i) == Some(&b'.') && bytes.get(i + 1).is_some_and(u8::is_ascii_digit) {
        out.push('.');
        i += 1;
        frac_digits = take_digits(bytes, &mut i, &mut out);
    }

    if int_digits + frac_digits == 0 {
        return 0.0;
    }

    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        let mut j = i + 1;
        let mut exponent = String::from("e");
        if let Some(&(sign @ (b'+' | b'-'))) = bytes.get(j) {
            exponent.push(sign as char);
            j += 1;
        }
        if take_digits(bytes, &mut j, &mut exponent) > 0 {
            out.push_str(&exponent);
        }
    }

    out.parse().unwrap_or(0.0)
}

fn take_digits(bytes: &[u8], i: &mut usize, out: &mut String) -> usize {
    let mut count = 0;
    while let Some(&b) = bytes.get(*i) {
        if b.is_ascii_digit() {
            out.push(b as char);
            count += 1;
            *i += 1;
        } else if b == b'_'
            && count > 0
            && bytes.get(*i + 1).is_some_and(u8::is_ascii_digit)
        {
            *i += 1;
        } else {
            break;
        }
    }
    count
}

/// Dotted target path of a descriptor, for diagnostics.
pub(crate) fn describe_target(descriptor: &OptionDescriptor) -> String {
    join_path(&descriptor.target_path)
}
