//! Transaction execution for one actor
//!
//! This module provides the `TransactionExecutor` struct, which applies one
//! actor's transaction log to the shared account.
//!
//! # Design
//!
//! Each transaction goes through the same steps:
//!
//! ```text
//! Parsed → LockAcquired → Applied{Success|Failed} → LockReleased
//! ```
//!
//! The lock is taken once per transaction rather than once per log, so two
//! executors running side by side interleave at transaction granularity. The
//! event is built and handed to the sink before the lock is released; the lock
//! is released on every exit path because it is held by a scoped guard.
//!
//! # Error Handling
//!
//! Declines (insufficient funds, overflow) are outcomes, not errors. Nothing
//! escapes `apply`; a pipeline only fails for reasons outside the executor.

use super::shared::SharedAccount;
use super::traits::{EventSink, NullSink};
use crate::types::{Actor, Outcome, Transaction, TransactionEvent, TransactionKind};
use tracing::debug;

/// Applies an actor's ledger to the shared account
#[derive(Debug, Clone)]
pub struct TransactionExecutor {
    /// Handle to the joint account, shared with the other executor
    account: SharedAccount,

    /// Whose ledger this executor runs; reporting only
    actor: Actor,
}

impl TransactionExecutor {
    /// Create an executor for `actor` over a shared account handle
    pub fn new(account: SharedAccount, actor: Actor) -> Self {
        Self { account, actor }
    }

    /// Apply a whole log in order and return its events
    pub fn apply(&self, log: &[Transaction]) -> Vec<TransactionEvent> {
        self.apply_with(log, &NullSink)
    }

    /// Apply a whole log in order, streaming each event to `sink`
    ///
    /// # Returns
    ///
    /// One event per transaction, in log order. Sequence numbers are increasing
    /// but not contiguous when another executor shares the account.
    pub fn apply_with(&self, log: &[Transaction], sink: &dyn EventSink) -> Vec<TransactionEvent> {
        log.iter()
            .map(|transaction| self.apply_one(transaction, sink))
            .collect()
    }

    /// Apply a single transaction under the account lock
    pub fn apply_one(&self, transaction: &Transaction, sink: &dyn EventSink) -> TransactionEvent {
        self.account.transact(|account, seq| {
            let result = match transaction.kind {
                TransactionKind::Deposit => Some(account.deposit(transaction.amount)),
                TransactionKind::Withdraw => Some(account.withdraw(transaction.amount)),
                TransactionKind::Unknown => None,
            };

            let outcome = match result {
                Some(Ok(_)) => Outcome::Applied,
                Some(Err(e)) => {
                    debug!(actor = %self.actor, line = transaction.line, error = %e, "transaction declined");
                    Outcome::Declined
                }
                None => Outcome::Ignored,
            };

            let event = TransactionEvent {
                seq,
                actor: self.actor,
                transaction: transaction.clone(),
                outcome,
                balance_after: account.balance,
            };
            sink.emit(&event);
            event
        })
    }
}
