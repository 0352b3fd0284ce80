//! I/O module
//!
//! Handles ledger input and run output.
//!
//! # Components
//!
//! - `source` - Acquired ledger inputs, read blocking or on the tokio runtime
//! - `report` - Text and CSV reporters streaming run events

pub mod report;
pub mod source;

pub use report::{format_event, Reporter};
pub use source::LedgerSource;
