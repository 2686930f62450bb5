//! Error types for ledger access.

use std::time::Duration;

use accredit_common::crypto::CryptoError;
use thiserror::Error;

/// Failure to read from the ledger.
///
/// Distinct from a compliance denial: a caller receiving this error has an
/// inconclusive answer and should retry, not treat the wallet as denied.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Transport or RPC failure reported by the reader.
    #[error("Ledger transport error: {0}")]
    Transport(String),

    /// The request did not complete within the configured timeout.
    #[error("Ledger request timed out after {0:?}")]
    Timeout(Duration),

    /// An account address could not be derived from its seeds.
    #[error("Address derivation failed: {0}")]
    Derivation(#[from] CryptoError),
}

impl LedgerError {
    /// Check if retrying the same request may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, LedgerError::Transport(_) | LedgerError::Timeout(_))
    }
}

/// Result type for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;
