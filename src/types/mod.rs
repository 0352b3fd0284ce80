//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `account`: The joint account and its mutation primitives
//! - `transaction`: Actors, transactions and events
//! - `error`: Error types for the bank

pub mod account;
pub mod error;
pub mod transaction;

pub use account::Account;
pub use error::BankError;
pub use transaction::{
    Actor, Outcome, Sequence, Transaction, TransactionEvent, TransactionKind, TransactionLog,
};
