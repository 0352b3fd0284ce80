//! Error types for the joint account bank
//!
//! This module defines every error that can occur while loading ledgers,
//! applying transactions and auditing a finished run. Errors are designed to be
//! descriptive and user-friendly for CLI output.
//!
//! # Error Categories
//!
//! - **Startup Errors**: a ledger file cannot be opened, the runtime cannot start
//! - **Ledger Parse Errors**: missing or malformed amounts, trailing tokens
//! - **Transaction Errors**: insufficient funds, arithmetic overflow
//! - **Run Errors**: a pipeline failed, the journal does not replay

use super::transaction::Actor;
use thiserror::Error;

/// Main error type for the bank
///
/// Only startup errors are fatal. Parse errors are recovered by the parser,
/// transaction errors become declined events, and run errors are collected in
/// the run report.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BankError {
    /// A ledger file could not be opened for reading
    ///
    /// This is a fatal error that prevents processing from starting.
    #[error("cannot open file '{path}': {message}")]
    FileAccess {
        /// The path that could not be opened
        path: String,
        /// Description of the underlying I/O error
        message: String,
    },

    /// I/O error occurred while reading a ledger or writing a report
    #[error("I/O error: {message}")]
    Io {
        /// Description of the I/O error
        message: String,
    },

    /// A deposit or withdraw line has no amount token
    #[error("line {line}: {keyword} requires an amount")]
    MissingAmount {
        /// Line number in the ledger (1-based)
        line: usize,
        /// The transaction keyword
        keyword: String,
    },

    /// The amount token is not an integer
    #[error("line {line}: invalid amount '{token}'")]
    MalformedAmount {
        /// Line number in the ledger (1-based)
        line: usize,
        /// The offending token
        token: String,
    },

    /// Extra text after the amount
    #[error("line {line}: unexpected token '{token}'")]
    UnexpectedToken {
        /// Line number in the ledger (1-based)
        line: usize,
        /// The first extra token
        token: String,
    },

    /// Insufficient funds for a withdrawal
    ///
    /// This is a recoverable error - the withdrawal is declined
    /// and the balance remains unchanged.
    #[error("insufficient funds: balance {balance}, requested {requested}")]
    InsufficientFunds {
        /// Balance at the time of the withdrawal
        balance: i64,
        /// Requested withdrawal amount
        requested: i64,
    },

    /// Arithmetic overflow would occur
    ///
    /// This is a recoverable error - the transaction is declined
    /// to maintain account integrity.
    #[error("arithmetic overflow in {operation}")]
    ArithmeticOverflow {
        /// Operation that would overflow
        operation: String,
    },

    /// One actor's pipeline did not complete
    #[error("{actor} pipeline failed: {message}")]
    PipelineFailed {
        /// Actor owning the failed pipeline
        actor: Actor,
        /// What went wrong
        message: String,
    },

    /// The async runtime could not be created
    #[error("runtime error: {message}")]
    Runtime {
        /// Description of the runtime error
        message: String,
    },

    /// A journal does not replay to the recorded outcomes
    #[error("audit mismatch at event {seq}: {message}")]
    AuditMismatch {
        /// Sequence number of the first inconsistent event
        seq: u64,
        /// What did not match
        message: String,
    },
}

// Conversion from io::Error to BankError
impl From<std::io::Error> for BankError {
    fn from(error: std::io::Error) -> Self {
        BankError::Io {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for BankError {
    fn from(error: csv::Error) -> Self {
        BankError::Io {
            message: error.to_string(),
        }
    }
}

// Helper functions for creating common errors

impl BankError {
    /// Create a FileAccess error
    pub fn file_access(path: &std::path::Path, error: &std::io::Error) -> Self {
        BankError::FileAccess {
            path: path.display().to_string(),
            message: error.to_string(),
        }
    }

    /// Create an InsufficientFunds error
    pub fn insufficient_funds(balance: i64, requested: i64) -> Self {
        BankError::InsufficientFunds { balance, requested }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(operation: &str) -> Self {
        BankError::ArithmeticOverflow {
            operation: operation.to_string(),
        }
    }

    /// Create a MissingAmount error
    pub fn missing_amount(line: usize, keyword: &str) -> Self {
        BankError::MissingAmount {
            line,
            keyword: keyword.to_string(),
        }
    }

    /// Create a MalformedAmount error
    pub fn malformed_amount(line: usize, token: &str) -> Self {
        BankError::MalformedAmount {
            line,
            token: token.to_string(),
        }
    }

    /// Create an UnexpectedToken error
    pub fn unexpected_token(line: usize, token: &str) -> Self {
        BankError::UnexpectedToken {
            line,
            token: token.to_string(),
        }
    }

    /// Create a PipelineFailed error
    pub fn pipeline_failed(actor: Actor, message: impl Into<String>) -> Self {
        BankError::PipelineFailed {
            actor,
            message: message.into(),
        }
    }

    /// Create an AuditMismatch error
    pub fn audit_mismatch(seq: u64, message: impl Into<String>) -> Self {
        BankError::AuditMismatch {
            seq,
            message: message.into(),
        }
    }
}
