//! Account-related types for the joint account bank
//!
//! This module defines the Account structure and its two mutation primitives.
//! Neither primitive is synchronized; the account is only ever reached through
//! [`crate::core::SharedAccount`], which holds the lock around every call.

use super::error::BankError;

/// The joint account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    /// Current balance
    ///
    /// May start negative (the opening balance is taken as given), but a
    /// withdrawal never pushes it below zero.
    pub balance: i64,
}

impl Account {
    /// Create an account holding the opening balance
    pub fn new(balance: i64) -> Self {
        Account { balance }
    }

    /// Deposit funds
    ///
    /// Always succeeds unless the balance would overflow, in which case the
    /// account is left unchanged. A negative amount lowers the balance.
    ///
    /// # Returns
    ///
    /// * `Ok(balance)` - The new balance
    /// * `Err(BankError::ArithmeticOverflow)` - If the sum does not fit
    pub fn deposit(&mut self, amount: i64) -> Result<i64, BankError> {
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or_else(|| BankError::arithmetic_overflow("deposit"))?;
        Ok(self.balance)
    }

    /// Withdraw funds
    ///
    /// Succeeds only when the balance is non-negative and covers the amount.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The balance is already negative
    /// - The amount exceeds the balance
    /// - The subtraction would overflow (negative amounts only)
    pub fn withdraw(&mut self, amount: i64) -> Result<i64, BankError> {
        if self.balance < 0 || self.balance < amount {
            return Err(BankError::insufficient_funds(self.balance, amount));
        }

        self.balance = self
            .balance
            .checked_sub(amount)
            .ok_or_else(|| BankError::arithmetic_overflow("withdraw"))?;
        Ok(self.balance)
    }
}
