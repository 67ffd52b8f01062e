//! Error types for the Nearword library.
//!
//! All fallible operations return [`NearwordError`] through the crate-wide
//! [`Result`] alias.
//!
//! # Examples
//!
//! ```
//! use nearword::error::{NearwordError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(NearwordError::invalid_word("Hello"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for Nearword operations.
///
/// `Io` and `Storage` together make up the I/O failure class: the log could not
/// be created, opened, written or read, so a durability guarantee was not met.
/// Those are always propagated to the caller.
#[derive(Error, Debug)]
pub enum NearwordError {
    /// I/O errors raised by the operating system.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Storage backend errors (missing files, closed storage, failed syncs).
    #[error("Storage error: {0}")]
    Storage(String),

    /// The log is already owned by another store.
    #[error("Log is locked: {0}")]
    LogLocked(String),

    /// A word outside the fingerprint domain (lowercase ASCII letters).
    #[error("Invalid word: {0}")]
    InvalidWord(String),

    /// Configuration errors.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// JSON serialization/deserialization errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for operations that may fail with NearwordError.
pub type Result<T> = std::result::Result<T, NearwordError>;

impl NearwordError {
    /// Create a new storage error.
    pub fn storage<S: Into<String>>(msg: S) -> Self {
        NearwordError::Storage(msg.into())
    }

    /// Create a new lock contention error.
    pub fn log_locked<S: Into<String>>(msg: S) -> Self {
        NearwordError::LogLocked(msg.into())
    }

    /// Create a new invalid word error.
    pub fn invalid_word<S: Into<String>>(msg: S) -> Self {
        NearwordError::InvalidWord(msg.into())
    }

    /// Create a new invalid config error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        NearwordError::InvalidConfig(msg.into())
    }

    /// Whether this error means the log could not be read or written.
    pub fn is_io_failure(&self) -> bool {
        matches!(self, NearwordError::Io(_) | NearwordError::Storage(_))
    }
}
