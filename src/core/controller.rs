//! Concurrent run orchestration
//!
//! This module provides the `ConcurrencyController`, which runs every actor's
//! pipeline at the same time against one shared account and reports the result.
//!
//! # Architecture
//!
//! ```text
//! ConcurrencyController
//!     ├── ExecutionStrategy (threads or tokio tasks)
//!     └── Pipeline × N, one per actor
//!         └── LedgerSource → parse_ledger → TransactionExecutor
//!                                               └── SharedAccount (one lock)
//! ```
//!
//! # Failure Policy
//!
//! Sources are opened before the run, so an unreadable path never gets this far.
//! A pipeline that fails afterwards (read error, invalid UTF-8, panic) stops on
//! its own; the other pipelines run to completion and the failure is returned in
//! [`RunReport::failures`]. A pipeline reads its whole ledger before applying
//! any of it, so a read failure applies nothing from that ledger.
//!
//! Every event is recorded in its pipeline's journal before the shared sink
//! sees it, so the events of a failed pipeline still account for every change
//! it made to the balance.

use super::audit;
use super::executor::TransactionExecutor;
use super::parser::parse_ledger;
use super::shared::SharedAccount;
use super::traits::{EventJournal, EventSink};
use crate::io::source::LedgerSource;
use crate::strategy::ExecutionStrategy;
use crate::types::{Actor, BankError, TransactionEvent};
use std::sync::Arc;
use tracing::{debug, info};

/// One actor's input, waiting to be run
#[derive(Debug)]
pub struct Pipeline {
    pub actor: Actor,
    pub source: LedgerSource,
}

impl Pipeline {
    pub fn new(actor: Actor, source: LedgerSource) -> Self {
        Self { actor, source }
    }

    /// Read, parse and execute this pipeline on the current thread
    ///
    /// Events go to `journal` first and then to `sink`.
    pub fn run(
        self,
        account: SharedAccount,
        journal: &EventJournal,
        sink: &dyn EventSink,
    ) -> Result<(), BankError> {
        let actor = self.actor;
        let origin = self.source.describe();
        let text = self
            .source
            .read_to_string()
            .map_err(|e| BankError::pipeline_failed(actor, e.to_string()))?;
        execute(actor, &origin, &text, account, &Recorder { journal, sink });
        Ok(())
    }

    /// Read the source on the tokio runtime, then parse and execute it
    pub async fn run_async(
        self,
        account: SharedAccount,
        journal: Arc<EventJournal>,
        sink: Arc<dyn EventSink>,
    ) -> Result<(), BankError> {
        let actor = self.actor;
        let origin = self.source.describe();
        let text = self
            .source
            .read_to_string_async()
            .await
            .map_err(|e| BankError::pipeline_failed(actor, e.to_string()))?;
        let recorder = Recorder {
            journal: journal.as_ref(),
            sink: sink.as_ref(),
        };
        execute(actor, &origin, &text, account, &recorder);
        Ok(())
    }
}

/// Journals each event before forwarding it
struct Recorder<'a> {
    journal: &'a EventJournal,
    sink: &'a dyn EventSink,
}

impl EventSink for Recorder<'_> {
    fn emit(&self, event: &TransactionEvent) {
        self.journal.emit(event);
        self.sink.emit(event);
    }
}

fn execute(actor: Actor, origin: &str, text: &str, account: SharedAccount, sink: &dyn EventSink) {
    let log = parse_ledger(text);
    debug!(%actor, origin, transactions = log.len(), "pipeline started");
    let events = TransactionExecutor::new(account, actor).apply_with(&log, sink);
    debug!(%actor, events = events.len(), "pipeline finished");
}

/// Outcome of a complete run
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub opening_balance: i64,

    /// Balance read after every pipeline was joined
    pub closing_balance: i64,

    /// Events of all pipelines, merged in the order they took effect
    pub events: Vec<TransactionEvent>,

    /// Pipelines that did not complete
    pub failures: Vec<BankError>,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Events belonging to one actor, in the order they took effect
    pub fn events_for(&self, actor: Actor) -> impl Iterator<Item = &TransactionEvent> {
        self.events.iter().filter(move |e| e.actor == actor)
    }

    /// Replay the merged journal and check it explains the closing balance
    pub fn audit(&self) -> Result<(), BankError> {
        let replayed = audit::replay(self.opening_balance, &self.events)?;
        if replayed != self.closing_balance {
            let seq = self.events.last().map(|e| e.seq).unwrap_or(0);
            return Err(BankError::audit_mismatch(
                seq,
                format!(
                    "closing balance {}, replay gives {}",
                    self.closing_balance, replayed
                ),
            ));
        }
        Ok(())
    }
}

/// Runs pipelines concurrently against a single shared account
pub struct ConcurrencyController {
    strategy: Box<dyn ExecutionStrategy>,
}

impl ConcurrencyController {
    pub fn new(strategy: Box<dyn ExecutionStrategy>) -> Self {
        Self { strategy }
    }

    /// Run every pipeline to completion
    ///
    /// Events are streamed to `sink` while the pipelines run, in the order they
    /// take effect. The closing balance is read only after all pipelines have
    /// been joined.
    pub fn run(
        &self,
        opening_balance: i64,
        pipelines: Vec<Pipeline>,
        sink: Arc<dyn EventSink>,
    ) -> RunReport {
        let account = SharedAccount::new(opening_balance);
        info!(opening_balance, pipelines = pipelines.len(), "starting run");

        let outcomes = self.strategy.execute(&account, pipelines, sink);

        let mut events = Vec::new();
        let mut failures = Vec::new();
        for outcome in outcomes {
            events.extend(outcome.events);
            failures.extend(outcome.failure);
        }
        events.sort_by_key(|e| e.seq);

        let closing_balance = account.balance();
        info!(closing_balance, failures = failures.len(), "run finished");

        RunReport {
            opening_balance,
            closing_balance,
            events,
            failures,
        }
    }
}
