//! # Nearword
//!
//! A durably backed word store answering nearest-neighbour queries over two
//! numeric fingerprints of each word.
//!
//! ## Features
//!
//! - Value and lexical fingerprints for lowercase ASCII words
//! - Ordered indices with exact, ceiling and floor lookups
//! - Plain-text write-ahead log replayed on open
//! - Pluggable storage backends
//! - HTTP front end and command line tool

pub mod bench;
pub mod cli;
pub mod config;
pub mod error;
pub mod fingerprint;
pub mod index;
pub mod record;
pub mod server;
pub mod service;
pub mod storage;
pub mod store;
pub mod wal;

pub mod prelude {
    pub use crate::config::{StoreConfig, SyncPolicy};
    pub use crate::error::{NearwordError, Result};
    pub use crate::fingerprint::{Fingerprints, compute_fingerprints};
    pub use crate::service::{MatchRequest, MatchResponse};
    pub use crate::store::{MatchResult, Store, StoreStats};
}
