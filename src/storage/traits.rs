//! Storage abstraction trait and common types.

use std::io::{Read, Write};

use crate::error::{NearwordError, Result};

/// A trait for storage backends holding the write-ahead log.
///
/// Names are flat file names relative to the backend root.
pub trait Storage: Send + Sync + std::fmt::Debug {
    /// Open a file for reading.
    fn open_input(&self, name: &str) -> Result<Box<dyn StorageInput>>;

    /// Open a file for appending, creating it when missing.
    fn create_output_append(&self, name: &str) -> Result<Box<dyn StorageOutput>>;

    /// Check if a file exists.
    fn file_exists(&self, name: &str) -> bool;

    /// Get the size of a file in bytes.
    fn file_size(&self, name: &str) -> Result<u64>;

    /// Take an exclusive lock named `name`.
    ///
    /// Fails with [`StorageError::LockFailed`] while another holder keeps it.
    /// The lock is released when the returned guard is dropped.
    fn lock(&self, name: &str) -> Result<Box<dyn StorageLock>>;
}

/// A trait for reading data from storage.
pub trait StorageInput: Read + Send + std::fmt::Debug {}

/// A trait for writing data to storage.
pub trait StorageOutput: Write + Send + Sync + std::fmt::Debug {
    /// Flush buffered bytes and sync them to stable storage.
    fn flush_and_sync(&mut self) -> Result<()>;

    /// Flush, sync and close the output stream.
    fn close(&mut self) -> Result<()>;
}

/// An exclusive lock held on a storage resource.
pub trait StorageLock: Send + Sync + std::fmt::Debug {
    /// Get the name of the lock.
    fn name(&self) -> &str;

    /// Release the lock before the guard is dropped.
    fn release(&mut self) -> Result<()>;
}

/// Configuration for storage backends.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Buffer size for I/O operations.
    pub buffer_size: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            buffer_size: 65536, // 64KB
        }
    }
}

/// Error types specific to storage operations.
#[derive(Debug, Clone)]
pub enum StorageError {
    /// File not found.
    FileNotFound(String),

    /// I/O error.
    IoError(String),

    /// Lock acquisition failed.
    LockFailed(String),

    /// Output handle already closed.
    OutputClosed(String),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::FileNotFound(name) => write!(f, "File not found: {name}"),
            StorageError::IoError(msg) => write!(f, "I/O error: {msg}"),
            StorageError::LockFailed(name) => write!(f, "Failed to acquire lock: {name}"),
            StorageError::OutputClosed(name) => write!(f, "Output is closed: {name}"),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<StorageError> for NearwordError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::LockFailed(name) => NearwordError::log_locked(name),
            other => NearwordError::storage(other.to_string()),
        }
    }
}
