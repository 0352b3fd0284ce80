//! Journal replay
//!
//! A merged event journal is a claim that the two ledgers were applied in one
//! particular total order. [`replay`] checks that claim from the opening
//! balance: the events must be in strictly increasing sequence order, each
//! actor's events must follow its ledger order, and every recorded outcome and
//! balance must be exactly what a sequential account would have produced.

use crate::types::{Account, Actor, BankError, Outcome, TransactionEvent, TransactionKind};
use std::collections::HashMap;

/// Replay `events` against a fresh account and return its final balance
///
/// # Errors
///
/// Returns `BankError::AuditMismatch` for the first event that is out of
/// order or whose outcome or balance disagrees with the replay.
pub fn replay(opening_balance: i64, events: &[TransactionEvent]) -> Result<i64, BankError> {
    let mut account = Account::new(opening_balance);
    let mut last_seq = 0;
    let mut last_line: HashMap<Actor, usize> = HashMap::new();

    for event in events {
        let seq = event.seq;
        if seq <= last_seq {
            return Err(BankError::audit_mismatch(
                seq,
                format!("sequence does not increase after {}", last_seq),
            ));
        }
        last_seq = seq;

        let line = event.transaction.line;
        if let Some(previous) = last_line.insert(event.actor, line) {
            if line <= previous {
                return Err(BankError::audit_mismatch(
                    seq,
                    format!(
                        "{} line {} applied after line {}",
                        event.actor, line, previous
                    ),
                ));
            }
        }

        let amount = event.transaction.amount;
        let expected = match event.transaction.kind {
            TransactionKind::Deposit => account.deposit(amount),
            TransactionKind::Withdraw => account.withdraw(amount),
            TransactionKind::Unknown => {
                if event.outcome != Outcome::Ignored {
                    return Err(BankError::audit_mismatch(
                        seq,
                        format!("unknown transaction recorded as {:?}", event.outcome),
                    ));
                }
                check_balance(seq, account.balance, event.balance_after)?;
                continue;
            }
        };

        let replayed = if expected.is_ok() {
            Outcome::Applied
        } else {
            Outcome::Declined
        };
        if replayed != event.outcome {
            return Err(BankError::audit_mismatch(
                seq,
                format!(
                    "{} {} recorded as {:?}, replay gives {:?}",
                    event.transaction.kind.label(),
                    amount,
                    event.outcome,
                    replayed
                ),
            ));
        }
        check_balance(seq, account.balance, event.balance_after)?;
    }

    Ok(account.balance)
}

fn check_balance(seq: u64, replayed: i64, recorded: i64) -> Result<(), BankError> {
    if replayed == recorded {
        Ok(())
    } else {
        Err(BankError::audit_mismatch(
            seq,
            format!("balance {}, expected {}", recorded, replayed),
        ))
    }
}
