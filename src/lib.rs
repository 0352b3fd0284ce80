//! Joint Account Bank Library
//! # Overview
//!
//! This library applies two partners' transaction ledgers concurrently to one
//! shared account balance, with one lock acquisition per transaction, and
//! guarantees that every run is serializable: no lost updates and no overdraft,
//! whatever the interleaving.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Account, Transaction, events, errors)
//! - [`cli`] - CLI arguments parsing
//! - [`core`] - Business logic components:
//!   - [`core::parser`] - Ledger text to ordered transaction logs
//!   - [`core::shared`] - Lock-guarded account handle shared by the pipelines
//!   - [`core::executor`] - Per-actor transaction application
//!   - [`core::controller`] - Concurrent run orchestration
//!   - [`core::audit`] - Journal replay
//! - [`strategy`] - Pluggable scheduling: OS threads or tokio tasks
//! - [`io`] - Ledger sources and report output
//!
//! # Transaction Types
//!
//! - **Deposit**: Credit funds to the account
//! - **Withdraw**: Debit funds (requires a non-negative balance covering the amount)
//! - **Unknown**: Unrecognised or malformed line, reported and never applied

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod strategy;
pub mod types;

pub use self::core::{ConcurrencyController, Pipeline, RunReport, SharedAccount, TransactionExecutor};
pub use io::{LedgerSource, Reporter};
pub use types::{
    Account, Actor, BankError, Outcome, Transaction, TransactionEvent, TransactionKind,
};
