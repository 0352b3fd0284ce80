//! Joint account bank CLI
//!
//! Applies two partners' transaction ledgers concurrently to one joint account.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- 100 husband.txt wife.txt
//! cargo run -- --strategy async --worker-threads 2 100 husband.txt wife.txt
//! cargo run -- --format csv 100 husband.txt wife.txt > run.csv
//! ```
//!
//! The report goes to stdout; diagnostics go to stderr and are controlled with
//! `RUST_LOG` (default `warn`).
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Usage error, a ledger file cannot be opened, or a pipeline failed

use joint_bank::cli::{self, OutputFormat, StrategyType};
use joint_bank::core::{ConcurrencyController, EventSink, Pipeline};
use joint_bank::io::{LedgerSource, Reporter};
use joint_bank::strategy;
use joint_bank::types::Actor;
use std::process;
use std::sync::Arc;
use tracing::error;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = cli::parse_args();

    // Both files are opened before anything is reported or applied
    let sources = LedgerSource::open(&args.husband_file)
        .and_then(|husband| Ok((husband, LedgerSource::open(&args.wife_file)?)));
    let (husband, wife) = match sources {
        Ok(sources) => sources,
        Err(e) => {
            eprintln!("bank: {}", e);
            process::exit(1);
        }
    };

    let strategy = {
        let config = if args.strategy == StrategyType::Async {
            Some(args.to_runtime_config())
        } else {
            None
        };
        strategy::create_strategy(args.strategy.clone(), config)
    };
    let controller = ConcurrencyController::new(strategy);

    let stdout = std::io::stdout();
    let reporter = Arc::new(match args.format {
        OutputFormat::Text => Reporter::text(stdout),
        OutputFormat::Csv => Reporter::csv(stdout),
    });

    reporter.opening(args.initial_balance);
    let report = controller.run(
        args.initial_balance,
        vec![
            Pipeline::new(Actor::Husband, husband),
            Pipeline::new(Actor::Wife, wife),
        ],
        Arc::clone(&reporter) as Arc<dyn EventSink>,
    );
    reporter.closing(report.closing_balance);

    if let Err(e) = report.audit() {
        error!(error = %e, "journal does not replay");
    }

    let mut failed = false;
    if let Err(e) = reporter.finish() {
        eprintln!("bank: {}", e);
        failed = true;
    }
    for failure in &report.failures {
        eprintln!("bank: {}", failure);
        failed = true;
    }
    if failed {
        process::exit(1);
    }
}
