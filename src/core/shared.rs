//! Lock-guarded handle to the joint account
//!
//! This module provides the `SharedAccount` struct, the only way to reach the
//! [`Account`] once a run has started.
//!
//! # Design
//!
//! The account lives behind a single `Arc<Mutex<..>>`. Every pipeline holds a
//! clone of the handle; the account is dropped with the last clone. The lock is
//! taken once per transaction through [`SharedAccount::transact`], which also
//! hands out the next sequence number. Because sequence numbers are issued while
//! the lock is held, their order is exactly the order in which transactions took
//! effect.
//!
//! # Thread Safety
//!
//! Lock acquisition blocks without timeout. The guard is released when
//! `transact` returns or unwinds. A poisoned lock is recovered: the account is
//! only ever assigned whole values, so a panic inside a critical section cannot
//! leave it half-updated.

use crate::types::{Account, Sequence};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::trace;

#[derive(Debug)]
struct Vault {
    account: Account,
    last_seq: Sequence,
}

/// Shared, lock-guarded account handle
///
/// Cloning is cheap and every clone refers to the same account.
#[derive(Debug, Clone)]
pub struct SharedAccount {
    vault: Arc<Mutex<Vault>>,
}

impl SharedAccount {
    /// Create a handle to a new account holding `opening_balance`
    pub fn new(opening_balance: i64) -> Self {
        Self {
            vault: Arc::new(Mutex::new(Vault {
                account: Account::new(opening_balance),
                last_seq: 0,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vault> {
        self.vault.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` with exclusive access to the account
    ///
    /// The closure receives the account and the sequence number assigned to
    /// this critical section. No other `transact` call can run until the
    /// closure returns.
    pub fn transact<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Account, Sequence) -> R,
    {
        let mut vault = self.lock();
        vault.last_seq += 1;
        let seq = vault.last_seq;
        trace!(seq, "account lock acquired");

        let result = f(&mut vault.account, seq);

        drop(vault);
        trace!(seq, "account lock released");
        result
    }

    /// Current balance
    ///
    /// A snapshot; it only reflects every transaction once all pipelines have
    /// been joined.
    pub fn balance(&self) -> i64 {
        self.lock().account.balance
    }

    /// Number of critical sections entered so far
    pub fn transactions_seen(&self) -> u64 {
        self.lock().last_seq
    }
}
