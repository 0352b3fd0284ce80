//! Run reporting
//!
//! This module turns a run into output, either the line-oriented text protocol
//! or CSV. A [`Reporter`] is an [`EventSink`], so events are written while the
//! run is in progress and appear in the order they took effect.
//!
//! # Text protocol
//!
//! ```text
//! Opening balance: 100
//! Deposit: 50, User: Husband, Account balance after: 150
//! Withdraw: 200, User: Wife, Transaction declined
//! Ignored: line 3, User: Wife, Unrecognised transaction
//! Closing balance: 150
//! ```
//!
//! # CSV protocol
//!
//! Columns `seq,user,transaction,amount,outcome,balance`, framed by an
//! `opening` row and a `closing` row.

use crate::core::traits::EventSink;
use crate::types::{BankError, Outcome, TransactionEvent};
use serde::Serialize;
use std::io::Write;
use std::sync::Mutex;

/// Format a single event as a text protocol line (without newline)
pub fn format_event(event: &TransactionEvent) -> String {
    let transaction = &event.transaction;
    let label = transaction.kind.label();
    match event.outcome {
        Outcome::Applied => format!(
            "{}: {}, User: {}, Account balance after: {}",
            label, transaction.amount, event.actor, event.balance_after
        ),
        Outcome::Declined => format!(
            "{}: {}, User: {}, Transaction declined",
            label, transaction.amount, event.actor
        ),
        Outcome::Ignored => format!(
            "{}: line {}, User: {}, Unrecognised transaction",
            label, transaction.line, event.actor
        ),
    }
}

/// CSV row for one line of the report
#[derive(Debug, Serialize, PartialEq)]
struct ReportRow<'a> {
    seq: Option<u64>,
    user: Option<&'a str>,
    transaction: &'a str,
    amount: Option<i64>,
    outcome: Option<&'a str>,
    balance: i64,
}

impl<'a> ReportRow<'a> {
    fn frame(transaction: &'a str, balance: i64) -> Self {
        Self {
            seq: None,
            user: None,
            transaction,
            amount: None,
            outcome: None,
            balance,
        }
    }

    fn from_event(event: &'a TransactionEvent) -> Self {
        let outcome = match event.outcome {
            Outcome::Applied => "applied",
            Outcome::Declined => "declined",
            Outcome::Ignored => "ignored",
        };
        Self {
            seq: Some(event.seq),
            user: Some(event.actor.as_str()),
            transaction: event.transaction.kind.label(),
            amount: Some(event.transaction.amount),
            outcome: Some(outcome),
            balance: event.balance_after,
        }
    }
}

enum Output<W: Write> {
    Text(W),
    Csv(csv::Writer<W>),
}

struct ReporterState<W: Write> {
    output: Output<W>,
    error: Option<BankError>,
}

impl<W: Write> ReporterState<W> {
    fn write_text(&mut self, line: &str) -> Result<(), BankError> {
        match &mut self.output {
            Output::Text(writer) => writeln!(writer, "{}", line).map_err(BankError::from),
            Output::Csv(_) => Ok(()),
        }
    }

    fn write_row(&mut self, row: &ReportRow<'_>) -> Result<(), BankError> {
        match &mut self.output {
            Output::Csv(writer) => writer.serialize(row).map_err(BankError::from),
            Output::Text(_) => Ok(()),
        }
    }

    /// Keep the first write error and ignore later writes
    fn record(&mut self, result: Result<(), BankError>) {
        if self.error.is_none() {
            if let Err(e) = result {
                self.error = Some(e);
            }
        }
    }

    fn flush(&mut self) -> Result<(), BankError> {
        match &mut self.output {
            Output::Text(writer) => writer.flush()?,
            Output::Csv(writer) => writer.flush()?,
        }
        Ok(())
    }
}

/// Streams a run to a writer
///
/// Write errors never interrupt the run; the first one is kept and returned by
/// [`Reporter::finish`].
pub struct Reporter<W: Write + Send> {
    state: Mutex<ReporterState<W>>,
}

impl<W: Write + Send> Reporter<W> {
    /// Report in the line-oriented text protocol
    pub fn text(writer: W) -> Self {
        Self::with_output(Output::Text(writer))
    }

    /// Report as CSV
    pub fn csv(writer: W) -> Self {
        Self::with_output(Output::Csv(csv::Writer::from_writer(writer)))
    }

    fn with_output(output: Output<W>) -> Self {
        Self {
            state: Mutex::new(ReporterState {
                output,
                error: None,
            }),
        }
    }

    fn with_state<F>(&self, f: F)
    where
        F: FnOnce(&mut ReporterState<W>) -> Result<(), BankError>,
    {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let result = f(&mut state);
        state.record(result);
    }

    /// Report the opening balance
    pub fn opening(&self, balance: i64) {
        self.with_state(|state| {
            state.write_text(&format!("Opening balance: {}", balance))?;
            state.write_row(&ReportRow::frame("opening", balance))?;
            // Flushed so the opening line is visible before any pipeline starts
            state.flush()
        });
    }

    /// Report the closing balance
    pub fn closing(&self, balance: i64) {
        self.with_state(|state| {
            state.write_text(&format!("Closing balance: {}", balance))?;
            state.write_row(&ReportRow::frame("closing", balance))
        });
    }

    /// Flush the output and return the first write error, if any
    pub fn finish(&self) -> Result<(), BankError> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let flushed = state.flush();
        match state.error.take() {
            Some(e) => Err(e),
            None => flushed,
        }
    }
}

impl<W: Write + Send> EventSink for Reporter<W> {
    fn emit(&self, event: &TransactionEvent) {
        self.with_state(|state| {
            state.write_text(&format_event(event))?;
            state.write_row(&ReportRow::from_event(event))
        });
    }
}
