//! Transaction-related types for the joint account bank
//!
//! This module defines the actors, parsed transactions and the events produced
//! when a transaction is applied to the shared account.

use std::fmt;

/// Sequence number of an event in the lock-acquisition order (starts at 1)
pub type Sequence = u64;

/// One of the two partners sharing the account
///
/// The actor identifies which pipeline a ledger or event belongs to. It is used
/// for reporting only and never changes how a transaction is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Actor {
    /// Owner of the first ledger file
    Husband,
    /// Owner of the second ledger file
    Wife,
}

impl Actor {
    /// Name used in report output
    pub fn as_str(&self) -> &'static str {
        match self {
            Actor::Husband => "Husband",
            Actor::Wife => "Wife",
        }
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transaction kinds understood by the bank
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
    /// Credit funds to the account
    Deposit,

    /// Debit funds from the account
    ///
    /// Requires a non-negative balance at least as large as the amount.
    Withdraw,

    /// Unrecognised or malformed line
    ///
    /// Kept in the ledger so line order is preserved, but never applied.
    Unknown,
}

impl TransactionKind {
    /// Label used in report output
    pub fn label(&self) -> &'static str {
        match self {
            TransactionKind::Deposit => "Deposit",
            TransactionKind::Withdraw => "Withdraw",
            TransactionKind::Unknown => "Ignored",
        }
    }
}

/// A parsed ledger line
///
/// Immutable once parsed. `line` is the 1-based position in the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub kind: TransactionKind,
    pub amount: i64,
    pub line: usize,
}

impl Transaction {
    pub fn deposit(amount: i64, line: usize) -> Self {
        Self {
            kind: TransactionKind::Deposit,
            amount,
            line,
        }
    }

    pub fn withdraw(amount: i64, line: usize) -> Self {
        Self {
            kind: TransactionKind::Withdraw,
            amount,
            line,
        }
    }

    pub fn unknown(amount: i64, line: usize) -> Self {
        Self {
            kind: TransactionKind::Unknown,
            amount,
            line,
        }
    }
}

/// Ordered transactions of one actor, in ledger line order
pub type TransactionLog = Vec<Transaction>;

/// Result of applying one transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The balance was updated
    Applied,
    /// The transaction was refused and the balance left unchanged
    Declined,
    /// An `Unknown` transaction; nothing was attempted
    Ignored,
}

/// Executor output for a single transaction
///
/// `balance_after` is the balance observed under the lock once the transaction
/// was handled: the new balance when applied, the unchanged one otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionEvent {
    pub seq: Sequence,
    pub actor: Actor,
    pub transaction: Transaction,
    pub outcome: Outcome,
    pub balance_after: i64,
}

impl TransactionEvent {
    pub fn is_applied(&self) -> bool {
        self.outcome == Outcome::Applied
    }
}
