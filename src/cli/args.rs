use crate::strategy::RuntimeConfig;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Apply two partners' transaction ledgers concurrently to one joint account
#[derive(Parser, Debug)]
#[command(name = "bank", version)]
#[command(about = "Apply two partners' transaction ledgers concurrently to one joint account", long_about = None)]
pub struct CliArgs {
    /// Opening balance of the joint account
    #[arg(value_name = "AMOUNT", allow_negative_numbers = true)]
    pub initial_balance: i64,

    /// Husband's ledger file
    #[arg(value_name = "FILE1")]
    pub husband_file: PathBuf,

    /// Wife's ledger file
    #[arg(value_name = "FILE2")]
    pub wife_file: PathBuf,

    /// How the two ledgers are run concurrently
    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        default_value = "threads",
        help = "Execution strategy: 'threads' for OS threads or 'async' for tokio tasks"
    )]
    pub strategy: StrategyType,

    /// Number of tokio worker threads (async mode only)
    #[arg(
        long = "worker-threads",
        value_name = "COUNT",
        help = "Number of tokio worker threads (default: CPU cores)"
    )]
    pub worker_threads: Option<usize>,

    /// Report format written to stdout
    #[arg(long = "format", value_name = "FORMAT", default_value = "text")]
    pub format: OutputFormat,
}

/// Available execution strategies
#[derive(Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyType {
    Threads,
    Async,
}

/// Available report formats
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Csv,
}

impl CliArgs {
    /// Create a RuntimeConfig from CLI arguments
    ///
    /// Falls back to the default worker count when none was given; a zero is
    /// replaced by the default with a warning.
    pub fn to_runtime_config(&self) -> RuntimeConfig {
        match self.worker_threads {
            Some(worker_threads) => RuntimeConfig::new(worker_threads),
            None => RuntimeConfig::default(),
        }
    }
}
