//! Error types for TierKV
//!
//! Provides a unified error type for all operations.
//!
//! A missing key is never an error here: lookups return `Option` from the
//! skip list all the way up to the memtable.

use thiserror::Error;

/// Result type alias using TierError
pub type Result<T> = std::result::Result<T, TierError>;

/// Unified error type for TierKV operations
#[derive(Debug, Error)]
pub enum TierError {
    // -------------------------------------------------------------------------
    // Argument Errors
    // -------------------------------------------------------------------------
    /// Rejected before any lock is taken; nothing has been applied.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}
