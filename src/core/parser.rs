//! Ledger parsing
//!
//! Turns the raw text of one actor's ledger into an ordered transaction log.
//!
//! # Format
//!
//! One transaction per line, `<keyword> <amount>`, separated by whitespace:
//!
//! ```text
//! deposit 50
//! withdraw 30
//! ```
//!
//! Blank lines are skipped. Keywords are matched exactly and case-sensitively;
//! anything else becomes an `Unknown` transaction that is never applied.
//!
//! # Error Handling
//!
//! [`LedgerParser`] yields one `Result` per non-blank line so callers can see
//! every problem. [`parse_ledger`] is the policy used by the pipelines: a bad
//! line is logged and kept as an inert `Unknown` entry, so a ledger always
//! parses and line order is never disturbed.

use crate::types::{BankError, Transaction, TransactionLog};
use std::str::Lines;
use tracing::warn;

const DEPOSIT: &str = "deposit";
const WITHDRAW: &str = "withdraw";

/// Streaming parser over ledger text
///
/// # Examples
///
/// ```
/// use joint_bank::core::parser::LedgerParser;
///
/// let parsed: Vec<_> = LedgerParser::new("deposit 10\n\nwithdraw x\n").collect();
/// assert_eq!(parsed.len(), 2);
/// assert!(parsed[0].is_ok());
/// assert!(parsed[1].is_err());
/// ```
#[derive(Debug, Clone)]
pub struct LedgerParser<'a> {
    lines: Lines<'a>,
    line_num: usize,
}

impl<'a> LedgerParser<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines(),
            line_num: 0,
        }
    }
}

impl Iterator for LedgerParser<'_> {
    type Item = Result<Transaction, BankError>;

    /// Parse the next non-blank line
    ///
    /// # Returns
    ///
    /// * `Some(Ok(Transaction))` - Successfully parsed line
    /// * `Some(Err(BankError))` - Malformed deposit or withdraw line
    /// * `None` - End of text reached
    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = self.lines.next()?;
            self.line_num += 1;
            if line.trim().is_empty() {
                continue;
            }
            return Some(parse_line(self.line_num, line));
        }
    }
}

/// Parse a single non-blank ledger line
///
/// Unknown keywords are not an error: they produce an `Unknown` transaction
/// carrying the amount when it parses, or 0 when it does not.
pub fn parse_line(line: usize, text: &str) -> Result<Transaction, BankError> {
    let mut tokens = text.split_whitespace();
    let keyword = tokens.next().unwrap_or_default();
    let amount_token = tokens.next();

    let build = match keyword {
        DEPOSIT => Transaction::deposit,
        WITHDRAW => Transaction::withdraw,
        _ => {
            let amount = amount_token
                .and_then(|token| token.parse::<i64>().ok())
                .unwrap_or(0);
            return Ok(Transaction::unknown(amount, line));
        }
    };

    let token = amount_token.ok_or_else(|| BankError::missing_amount(line, keyword))?;
    let amount = token
        .parse::<i64>()
        .map_err(|_| BankError::malformed_amount(line, token))?;
    if let Some(extra) = tokens.next() {
        return Err(BankError::unexpected_token(line, extra));
    }

    Ok(build(amount, line))
}

/// Parse a whole ledger, recovering from malformed lines
///
/// Every error from [`LedgerParser`] is logged as a warning and replaced by an
/// `Unknown` transaction with amount 0 at the same line.
pub fn parse_ledger(text: &str) -> TransactionLog {
    LedgerParser::new(text)
        .map(|result| {
            result.unwrap_or_else(|e| {
                warn!(error = %e, "treating malformed ledger line as unknown");
                Transaction::unknown(0, error_line(&e))
            })
        })
        .collect()
}

fn error_line(error: &BankError) -> usize {
    match error {
        BankError::MissingAmount { line, .. }
        | BankError::MalformedAmount { line, .. }
        | BankError::UnexpectedToken { line, .. } => *line,
        _ => 0,
    }
}
