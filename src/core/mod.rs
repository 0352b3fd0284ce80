//! Core business logic module
//!
//! This module contains the concurrent transaction engine:
//! - `parser` - Ledger text to ordered transaction logs
//! - `shared` - The lock-guarded account handle shared by all pipelines
//! - `executor` - Applies one actor's log, one lock acquisition per transaction
//! - `controller` - Runs every pipeline concurrently and joins them
//! - `audit` - Replays a merged journal to check it is serializable
//! - `traits` - The event sink seam

pub mod audit;
pub mod controller;
pub mod executor;
pub mod parser;
pub mod shared;
pub mod traits;

pub use controller::{ConcurrencyController, Pipeline, RunReport};
pub use executor::TransactionExecutor;
pub use parser::{parse_ledger, LedgerParser};
pub use shared::SharedAccount;
pub use traits::{EventJournal, EventSink, NullSink};
