//! layerconf: merge document defaults with document-declared flags
//!
//! Loads a configuration document, registers the flags it declares, and prints
//! the merged configuration as YAML or JSON.

use anyhow::Result;
use std::process::ExitCode;

mod cli;

fn main() -> Result<ExitCode> {
    cli::run()
}
