//! Error types for Chronicle

use std::fmt;

/// Errors raised by the ledger core and its boundary layer.
///
/// In the validation variants, `index` is always the block's zero-based
/// position in the chain, not its stored index field - the stored field may
/// itself be what was tampered with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    EmptyMessage,
    MessageTooLong { limit: usize, actual: usize },
    InvalidGenesis(String),
    NonSequentialIndex { index: u64, expected: u64, got: u64 },
    BrokenLinkage { index: u64 },
    DigestMismatch { index: u64 },
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LedgerError::EmptyMessage => write!(f, "Message must not be empty"),
            LedgerError::MessageTooLong { limit, actual } => {
                write!(f, "Message too long: {} characters (limit {})", actual, limit)
            }
            LedgerError::InvalidGenesis(msg) => write!(f, "Invalid genesis block: {}", msg),
            LedgerError::NonSequentialIndex { index, expected, got } => write!(
                f,
                "Non-sequential index at block {}: expected {}, got {}",
                index, expected, got
            ),
            LedgerError::BrokenLinkage { index } => {
                write!(f, "Broken linkage at block {}: previous hash does not match", index)
            }
            LedgerError::DigestMismatch { index } => {
                write!(f, "Digest mismatch at block {}: stored hash is not reproducible", index)
            }
        }
    }
}

impl std::error::Error for LedgerError {}

/// Convenience alias used across the crate
pub type Result<T> = std::result::Result<T, LedgerError>;
