//! Command-line interface for layerconf
//!
//! Tool options come first, then the document path; every argument after the
//! document is handed to the flags the document declares.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use layerconf::{load_resolver, ConfigError, ResolvedConfig};

/// Merge a document's defaults with the command-line flags it declares
#[derive(Parser)]
#[command(name = "layerconf")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format for the resolved configuration
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Yaml)]
    format: OutputFormat,

    /// Indent JSON output
    #[arg(long)]
    pretty: bool,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long)]
    verbose: bool,

    /// Configuration document (YAML, JSON or TOML)
    #[arg(value_name = "DOCUMENT")]
    document: PathBuf,

    /// Arguments for the flags declared in the document (put `--` first when the
    /// first of them is also a layerconf option)
    #[arg(value_name = "ARGS", trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Yaml,
    Json,
}

pub fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    // RUST_LOG in the environment always takes precedence; --verbose falls back to DEBUG.
    let filter = if cli.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    let resolver = load_resolver(&cli.document)?
        .program_name(format!("{} {}", env!("CARGO_BIN_NAME"), cli.document.display()));

    let config = match resolver.resolve(&cli.args) {
        Ok(config) => config,
        Err(ConfigError::Parse(err)) => err.exit(),
        Err(ConfigError::Missing(missing)) => {
            eprintln!("{}", missing);
            eprintln!("{}", missing.usage);
            return Ok(ExitCode::from(1));
        }
        Err(err) => return Err(err.into()),
    };

    println!("{}", render(&config, cli.format, cli.pretty)?.trim_end());
    Ok(ExitCode::SUCCESS)
}

fn render(config: &ResolvedConfig, format: OutputFormat, pretty: bool) -> Result<String> {
    match format {
        OutputFormat::Yaml => config.to_yaml().context("Failed rendering YAML"),
        OutputFormat::Json if pretty => config.to_json_pretty().context("Failed rendering JSON"),
        OutputFormat::Json => config.to_json().context("Failed rendering JSON"),
    }
}
