//! Storage abstraction layer for Nearword.
//!
//! The write-ahead log talks to a pluggable backend: the file system for real
//! deployments, memory for tests.

pub mod file;
pub mod memory;
pub mod traits;

// Re-export commonly used types
pub use file::*;
pub use memory::*;
pub use traits::*;
