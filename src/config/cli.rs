//! Document-declared command-line flags
//!
//! Each option descriptor becomes one clap argument taking a single value. The
//! value is always the next argument, even when it starts with `-`, and a long
//! flag may be abbreviated to any unambiguous prefix.
//! Parsing writes the raw strings into a nested mapping at the descriptors'
//! target paths, then coerces the values that were actually supplied.

use clap::{Arg, ArgAction, ArgMatches, Command};
use serde_json::{Map, Number, Value};
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

use super::error::ConfigError;
use super::options::{describe_target, parse_float_lenient, FlagSpec, OptionDescriptor, ValueType};
use super::path::{get_path, has_path, set_path};

/// Id of the hidden catch-all for non-flag arguments.
const OPERANDS_ID: &str = "__operands";

pub struct CommandLineResolver {
    descriptors: Vec<OptionDescriptor>,
    specs: Vec<FlagSpec>,
    command: Command,
    options: Map<String, Value>,
    operands: Vec<String>,
}

impl CommandLineResolver {
    /// Register one flag per descriptor on a command named `program`.
    pub fn new(
        program: impl Into<String>,
        descriptors: Vec<OptionDescriptor>,
    ) -> Result<Self, ConfigError> {
        let specs = descriptors
            .iter()
            .map(|d| FlagSpec::parse(&d.flag_spec, &d.target_path))
            .collect::<Result<Vec<_>, _>>()?;
        check_unique_flags(&specs)?;

        let short_help = !specs.iter().any(|s| s.short == Some('h'));
        let long_help = !specs.iter().any(|s| s.long.as_deref() == Some("help"));

        let program: String = program.into();
        let mut command = Command::new(program)
            .no_binary_name(true)
            .infer_long_args(true)
            .disable_help_flag(true)
            .arg(
                Arg::new(OPERANDS_ID)
                    .action(ArgAction::Append)
                    .value_parser(clap::value_parser!(String))
                    .hide(true),
            );
        if short_help || long_help {
            let mut help = Arg::new("help").help("Print help").action(ArgAction::Help);
            if short_help {
                help = help.short('h');
            }
            if long_help {
                help = help.long("help");
            }
            command = command.arg(help);
        }

        for (index, (descriptor, spec)) in descriptors.iter().zip(&specs).enumerate() {
            let mut arg = Arg::new(arg_id(index))
                .value_name(spec.value_name.clone())
                .value_parser(clap::value_parser!(String))
                .num_args(1)
                .allow_hyphen_values(true)
                .action(ArgAction::Append);
            if let Some(long) = &spec.long {
                arg = arg.long(long.clone());
            }
            if let Some(short) = spec.short {
                arg = arg.short(short);
            }
            if let Some(description) = &descriptor.description {
                arg = arg.help(description.clone());
            }
            command = command.arg(arg);
        }

        Ok(Self { descriptors, specs, command, options: Map::new(), operands: Vec::new() })
    }

    /// Same as [`CommandLineResolver::new`], starting from a raw `cli` section.
    pub fn from_section(program: impl Into<String>, section: &Value) -> Result<Self, ConfigError> {
        Self::new(program, OptionDescriptor::parse_section(section)?)
    }

    /// Parse `args` (without the program name) and coerce the supplied values.
    ///
    /// Starts from an empty mapping on every call.
    pub fn parse_from<I, T>(&mut self, args: I) -> Result<&Map<String, Value>, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        let matches = self.command.clone().try_get_matches_from(args)?;

        self.options = Map::new();
        self.operands = matches
            .get_many::<String>(OPERANDS_ID)
            .map(|values| values.cloned().collect())
            .unwrap_or_default();
        if !self.operands.is_empty() {
            tracing::debug!(operands = ?self.operands, "ignoring non-flag arguments");
        }

        for (index, value) in self.occurrences(&matches) {
            set_path(&mut self.options, &self.descriptors[index].target_path, Value::String(value))?;
        }

        self.coerce_values()?;
        Ok(&self.options)
    }

    /// Resolved values of the flags supplied to the last parse.
    pub fn options(&self) -> &Map<String, Value> {
        &self.options
    }

    /// Non-flag arguments seen by the last parse.
    pub fn operands(&self) -> &[String] {
        &self.operands
    }

    pub fn descriptors(&self) -> &[OptionDescriptor] {
        &self.descriptors
    }

    /// Help text listing every registered flag.
    pub fn usage(&self) -> String {
        self.command.clone().render_help().to_string()
    }

    /// Every supplied value as `(descriptor index, raw value)`, in command-line order.
    fn occurrences(&self, matches: &ArgMatches) -> Vec<(usize, String)> {
        let mut seen: Vec<(usize, usize, String)> = Vec::new();
        for index in 0..self.descriptors.len() {
            let id = arg_id(index);
            let (Some(values), Some(positions)) =
                (matches.get_many::<String>(&id), matches.indices_of(&id))
            else {
                continue;
            };
            for (value, position) in values.zip(positions) {
                seen.push((position, index, value.clone()));
            }
        }
        seen.sort_by_key(|(position, _, _)| *position);
        seen.into_iter().map(|(_, index, value)| (index, value)).collect()
    }

    fn coerce_values(&mut self) -> Result<(), ConfigError> {
        for (descriptor, spec) in self.descriptors.iter().zip(&self.specs) {
            let path = &descriptor.target_path;
            if descriptor.value_type == ValueType::String || !has_path(&self.options, path) {
                continue;
            }

            let raw = match get_path(&self.options, path)? {
                Value::String(raw) => raw.clone(),
                other => other.to_string(),
            };

            let coerced = match descriptor.value_type {
                ValueType::FileContents => {
                    let file = PathBuf::from(&raw);
                    let contents = fs::read_to_string(&file)
                        .map_err(|source| ConfigError::Io { path: file, source })?;
                    Value::String(contents)
                }
                ValueType::Float => {
                    let number = parse_float_lenient(&raw);
                    let number = Number::from_f64(number).ok_or_else(|| ConfigError::Coercion {
                        flag: spec.display_name(),
                        reason: format!("'{}' is out of range for a float", raw),
                    })?;
                    Value::Number(number)
                }
                ValueType::String => continue,
            };

            tracing::debug!(
                flag = %spec.display_name(),
                target = %describe_target(descriptor),
                kind = ?descriptor.value_type,
                "coerced option value"
            );
            set_path(&mut self.options, path, coerced)?;
        }
        Ok(())
    }
}

fn arg_id(index: usize) -> String {
    format!("option-{}", index)
}

fn check_unique_flags(specs: &[FlagSpec]) -> Result<(), ConfigError> {
    let mut longs = HashSet::new();
    let mut shorts = HashSet::new();
    for spec in specs {
        if let Some(long) = &spec.long {
            if !longs.insert(long.as_str()) {
                return Err(ConfigError::syntax(format!("flag --{} is declared twice", long)));
            }
        }
        if let Some(short) = spec.short {
            if !shorts.insert(short) {
                return Err(ConfigError::syntax(format!("flag -{} is declared twice", short)));
            }
        }
    }
    Ok(())
}
