// CLI module
// Command-line interface and argument parsing

mod args;

pub use args::{CliArgs, OutputFormat, StrategyType};

use clap::error::ErrorKind;
use clap::Parser;
use std::process;

/// Parse command-line arguments using clap
///
/// `--help` and `--version` print and exit with status 0. Any other parse
/// failure (wrong argument count, non-numeric amount, unknown option) prints
/// clap's usage diagnostic to stderr and exits with status 1.
pub fn parse_args() -> CliArgs {
    CliArgs::try_parse().unwrap_or_else(|e| match e.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => e.exit(),
        _ => {
            let _ = e.print();
            process::exit(1);
        }
    })
}
