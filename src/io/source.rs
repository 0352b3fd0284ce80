//! Ledger inputs
//!
//! A [`LedgerSource`] is an input that has already been acquired: either text
//! held in memory or a file opened before the run started. Reading happens
//! later, inside the pipeline that owns the source, either blocking or on the
//! tokio runtime.
//!
//! # Error Handling
//!
//! - Failing to open a file is a startup error returned from [`LedgerSource::open`]
//! - Failing to read it (I/O error, invalid UTF-8) is returned from the read methods

use crate::types::BankError;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;

/// An acquired ledger input
#[derive(Debug)]
pub enum LedgerSource {
    /// Ledger text already in memory
    Text(String),

    /// A ledger file opened for reading
    File {
        /// Path, kept for diagnostics
        path: PathBuf,
        /// The open handle
        file: File,
    },
}

impl LedgerSource {
    /// Open a ledger file for reading
    ///
    /// # Returns
    ///
    /// * `Ok(LedgerSource)` if the file was opened
    /// * `Err(BankError::FileAccess)` if it could not be
    pub fn open(path: &Path) -> Result<Self, BankError> {
        let file = File::open(path).map_err(|e| BankError::file_access(path, &e))?;
        Ok(LedgerSource::File {
            path: path.to_path_buf(),
            file,
        })
    }

    /// Wrap in-memory ledger text
    pub fn text(text: impl Into<String>) -> Self {
        LedgerSource::Text(text.into())
    }

    /// Human-readable origin of this source
    pub fn describe(&self) -> String {
        match self {
            LedgerSource::Text(_) => "<memory>".to_string(),
            LedgerSource::File { path, .. } => path.display().to_string(),
        }
    }

    /// Read the whole ledger, blocking the current thread
    pub fn read_to_string(self) -> Result<String, BankError> {
        match self {
            LedgerSource::Text(text) => Ok(text),
            LedgerSource::File { path, mut file } => {
                let mut text = String::new();
                file.read_to_string(&mut text)
                    .map_err(|e| read_error(&path, e))?;
                Ok(text)
            }
        }
    }

    /// Read the whole ledger on the tokio runtime
    pub async fn read_to_string_async(self) -> Result<String, BankError> {
        match self {
            LedgerSource::Text(text) => Ok(text),
            LedgerSource::File { path, file } => {
                let mut file = tokio::fs::File::from_std(file);
                let mut text = String::new();
                file.read_to_string(&mut text)
                    .await
                    .map_err(|e| read_error(&path, e))?;
                Ok(text)
            }
        }
    }
}

fn read_error(path: &Path, error: std::io::Error) -> BankError {
    BankError::Io {
        message: format!("failed to read '{}': {}", path.display(), error),
    }
}
