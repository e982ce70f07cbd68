//! `qaml parse` command implementation.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use qaml_config::{CliSettings, Config};

use super::parse_file;
use crate::error::CliError;

/// Arguments for the parse command.
#[derive(Args)]
pub(crate) struct ParseArgs {
    /// Markup file to parse.
    input: PathBuf,

    /// Print JSON on a single line.
    #[arg(long)]
    compact: bool,

    /// Maximum nesting depth (overrides config).
    #[arg(long, env = "QAML_MAX_DEPTH")]
    max_depth: Option<usize>,

    /// Path to configuration file (default: auto-discover qaml.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl ParseArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let cli_settings = CliSettings {
            max_depth: self.max_depth,
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let json = tree_json(&self, &config)?;
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{json}")?;
        Ok(())
    }
}

fn tree_json(args: &ParseArgs, config: &Config) -> Result<String, CliError> {
    let tree = parse_file(&args.input, &config.parser.options())?;
    let json = if args.compact {
        serde_json::to_string(&tree)?
    } else {
        serde_json::to_string_pretty(&tree)?
    };
    Ok(json)
}
