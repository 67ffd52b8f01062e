//! Durable dual-index word store.
//!
//! A [`Store`] owns one [`WriteAheadLog`] and two [`OrderedIndex`]es, one keyed
//! by value fingerprint and one by lexical fingerprint. The log is the source
//! of truth; the indices are rebuilt from it on open.
//!
//! Inserts append to the log first and touch the indices only after the append
//! succeeded. The log append and both index updates run under one writer lock,
//! so readers never observe a half-applied insert.
//!
//! ```
//! use std::sync::Arc;
//!
//! use nearword::config::StoreConfig;
//! use nearword::storage::MemoryStorage;
//! use nearword::store::Store;
//!
//! # fn example() -> nearword::error::Result<()> {
//! let store = Store::with_storage(Arc::new(MemoryStorage::new()), StoreConfig::default())?;
//! store.insert("ab")?;
//!
//! let result = store.handle("abc")?;
//! assert_eq!(result.closest_by_value.as_deref(), Some("ab"));
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use log::info;
use ordered_float::OrderedFloat;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::config::StoreConfig;
use crate::error::{NearwordError, Result};
use crate::fingerprint::{compute_fingerprints, validate_word};
use crate::index::OrderedIndex;
use crate::record::Record;
use crate::storage::{FileStorage, Storage, StorageLock};
use crate::wal::WriteAheadLog;

/// Nearest matches for a handled word, computed before the word was stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub closest_by_value: Option<String>,
    pub closest_lexically: Option<String>,
}

/// Store statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStats {
    /// Distinct value fingerprints.
    pub value_keys: usize,
    /// Distinct lexical fingerprints.
    pub lexical_keys: usize,
    /// Records applied from the log on open.
    pub replayed: usize,
}

#[derive(Debug)]
struct StoreState {
    wal: WriteAheadLog,
    by_value: OrderedIndex<u64>,
    by_lexical: OrderedIndex<OrderedFloat<f64>>,
    // Declared after `wal` so the log handle is closed before the lock goes.
    lock: Option<Box<dyn StorageLock>>,
}

fn apply_record(
    by_value: &mut OrderedIndex<u64>,
    by_lexical: &mut OrderedIndex<OrderedFloat<f64>>,
    record: Record,
) {
    by_lexical.put(OrderedFloat(record.lexical_fingerprint), record.word.clone());
    by_value.put(record.value_fingerprint, record.word);
}

impl StoreState {
    fn apply(&mut self, record: Record) {
        apply_record(&mut self.by_value, &mut self.by_lexical, record);
    }

    fn insert(&mut self, record: Record) -> Result<()> {
        if self.lock.is_none() {
            return Err(NearwordError::storage(format!(
                "store over {} is closed",
                self.wal.name()
            )));
        }
        self.wal.append(&record)?;
        self.apply(record);
        Ok(())
    }
}

/// The durable word store.
#[derive(Debug)]
pub struct Store {
    state: RwLock<StoreState>,
    replayed: usize,
}

impl Store {
    /// Open a file-backed store under `config.data_dir`.
    pub fn open(config: StoreConfig) -> Result<Self> {
        config.validate()?;
        let storage = FileStorage::new(&config.data_dir, config.storage_config())?;
        Self::with_storage(Arc::new(storage), config)
    }

    /// Open a store on any storage backend.
    ///
    /// Takes the exclusive lock on the log, then replays it into both indices
    /// in file order; later records overwrite earlier ones with the same key.
    pub fn with_storage(storage: Arc<dyn Storage>, config: StoreConfig) -> Result<Self> {
        config.validate()?;
        let lock = storage.lock(&config.log_file)?;
        let wal = WriteAheadLog::new(storage, &config.log_file, config.sync_policy);

        let mut state = StoreState {
            wal,
            by_value: OrderedIndex::new(),
            by_lexical: OrderedIndex::new(),
            lock: Some(lock),
        };

        let replayed = {
            let StoreState {
                wal,
                by_value,
                by_lexical,
                ..
            } = &mut state;
            wal.replay_with(|record| apply_record(by_value, by_lexical, record))?
        };
        if replayed > 0 {
            info!(
                "loaded {} records from {} ({} value keys, {} lexical keys)",
                replayed,
                config.log_file,
                state.by_value.len(),
                state.by_lexical.len()
            );
        }

        Ok(Store {
            state: RwLock::new(state),
            replayed,
        })
    }

    /// Durably store `word`.
    ///
    /// The log append happens first; if it fails the indices are untouched.
    pub fn insert(&self, word: &str) -> Result<()> {
        validate_word(word)?;
        let record = Record::from_word(word);
        self.state.write().insert(record)
    }

    /// The stored word whose value fingerprint is closest to `value`.
    pub fn query_by_value(&self, value: u64) -> Option<String> {
        self.state.read().by_value.nearest(&value).map(str::to_string)
    }

    /// The stored word whose lexical fingerprint is closest to `lexical`.
    pub fn query_by_lexical(&self, lexical: f64) -> Option<String> {
        self.state
            .read()
            .by_lexical
            .nearest(&OrderedFloat(lexical))
            .map(str::to_string)
    }

    /// Find the nearest stored words for `word`, then store it.
    ///
    /// Both lookups run before the insert, so a word never matches itself on
    /// its first occurrence. The whole call is one atomic step with respect to
    /// other callers.
    pub fn handle(&self, word: &str) -> Result<MatchResult> {
        validate_word(word)?;
        let fingerprints = compute_fingerprints(word);

        let mut state = self.state.write();
        let result = MatchResult {
            closest_by_value: state
                .by_value
                .nearest(&fingerprints.value)
                .map(str::to_string),
            closest_lexically: state
                .by_lexical
                .nearest(&OrderedFloat(fingerprints.lexical))
                .map(str::to_string),
        };
        state.insert(Record::new(word, fingerprints.value, fingerprints.lexical))?;

        Ok(result)
    }

    /// Size of the log in bytes.
    pub fn log_size(&self) -> Result<u64> {
        self.state.read().wal.size()
    }

    pub fn stats(&self) -> StoreStats {
        let state = self.state.read();
        StoreStats {
            value_keys: state.by_value.len(),
            lexical_keys: state.by_lexical.len(),
            replayed: self.replayed,
        }
    }

    /// Close the log and release the log lock.
    ///
    /// Queries keep working on the in-memory indices; inserts fail afterwards.
    /// Calling `close` twice is a no-op.
    pub fn close(&self) -> Result<()> {
        let mut state = self.state.write();
        state.wal.close()?;
        if let Some(mut lock) = state.lock.take() {
            lock.release()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::storage::{MemoryStorage, StorageError, StorageInput, StorageOutput};

    fn memory_store(storage: &MemoryStorage) -> Store {
        Store::with_storage(Arc::new(storage.clone()), StoreConfig::default()).unwrap()
    }

    /// Storage whose log writes always fail.
    #[derive(Debug, Default)]
    struct BrokenDisk {
        inner: MemoryStorage,
    }

    #[derive(Debug)]
    struct BrokenOutput;

    impl Write for BrokenOutput {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("disk on fire"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl StorageOutput for BrokenOutput {
        fn flush_and_sync(&mut self) -> Result<()> {
            Ok(())
        }

        fn close(&mut self) -> Result<()> {
            Ok(())
        }
    }

    impl Storage for BrokenDisk {
        fn open_input(&self, name: &str) -> Result<Box<dyn StorageInput>> {
            self.inner.open_input(name)
        }

        fn create_output_append(&self, _name: &str) -> Result<Box<dyn StorageOutput>> {
            Ok(Box::new(BrokenOutput))
        }

        fn file_exists(&self, name: &str) -> bool {
            self.inner.file_exists(name)
        }

        fn file_size(&self, name: &str) -> Result<u64> {
            self.inner.file_size(name)
        }

        fn lock(&self, name: &str) -> Result<Box<dyn StorageLock>> {
            self.inner.lock(name)
        }
    }

    #[test]
    fn test_first_handle_has_no_matches() {
        let store = memory_store(&MemoryStorage::new());

        let result = store.handle("hello").unwrap();
        assert_eq!(result, MatchResult::default());

        let result = store.handle("hello").unwrap();
        assert_eq!(result.closest_by_value.as_deref(), Some("hello"));
        assert_eq!(result.closest_lexically.as_deref(), Some("hello"));
    }

    #[test]
    fn test_value_queries() {
        let store = memory_store(&MemoryStorage::new());
        store.insert("ab").unwrap(); // 3
        store.insert("abc").unwrap(); // 6

        assert_eq!(store.query_by_value(5).as_deref(), Some("abc"));
        assert_eq!(store.query_by_value(4).as_deref(), Some("ab"));
        assert_eq!(store.query_by_value(100).as_deref(), Some("abc"));
    }

    #[test]
    fn test_overwrite_wins_on_value_collision() {
        let store = memory_store(&MemoryStorage::new());
        store.insert("ab").unwrap();
        store.insert("ba").unwrap();

        assert_eq!(store.query_by_value(3).as_deref(), Some("ba"));
        assert_eq!(store.stats().value_keys, 1);
        assert_eq!(store.stats().lexical_keys, 2);
    }

    #[test]
    fn test_lexical_queries() {
        let store = memory_store(&MemoryStorage::new());
        store.insert("apple").unwrap();
        store.insert("mango").unwrap();
        store.insert("zebra").unwrap();

        let near_m = compute_fingerprints("melon").lexical;
        assert_eq!(store.query_by_lexical(near_m).as_deref(), Some("mango"));
        assert_eq!(store.query_by_lexical(0.0).as_deref(), Some("apple"));
        assert_eq!(store.query_by_lexical(1.5).as_deref(), Some("zebra"));
    }

    #[test]
    fn test_invalid_word_is_rejected_before_logging() {
        let storage = MemoryStorage::new();
        let store = memory_store(&storage);

        assert!(matches!(
            store.insert("two words"),
            Err(NearwordError::InvalidWord(_))
        ));
        assert!(store.handle("").is_err());
        assert!(!storage.file_exists("logs.txt"));
        assert_eq!(store.stats().value_keys, 0);
    }

    #[test]
    fn test_failed_append_leaves_indices_untouched() {
        let store =
            Store::with_storage(Arc::new(BrokenDisk::default()), StoreConfig::default()).unwrap();

        let err = store.insert("ab").unwrap_err();
        assert!(err.is_io_failure());
        assert_eq!(store.query_by_value(3), None);

        let err = store.handle("ab").unwrap_err();
        assert!(err.is_io_failure());
        assert_eq!(store.stats().value_keys, 0);
        assert_eq!(store.stats().lexical_keys, 0);
    }

    #[test]
    fn test_reopen_replays_log() {
        let storage = MemoryStorage::new();
        {
            let store = memory_store(&storage);
            for word in ["ab", "abc", "ba", "zzz"] {
                store.insert(word).unwrap();
            }
            store.close().unwrap();
        }

        let store = memory_store(&storage);
        assert_eq!(store.stats().replayed, 4);
        assert_eq!(
            store.log_size().unwrap(),
            storage.file_size("logs.txt").unwrap()
        );
        assert!(store.log_size().unwrap() > 0);
        assert_eq!(store.query_by_value(3).as_deref(), Some("ba"));
        assert_eq!(store.query_by_value(70).as_deref(), Some("zzz"));
    }

    #[test]
    fn test_second_store_on_same_log_is_refused() {
        let storage = MemoryStorage::new();
        let first = memory_store(&storage);

        let second = Store::with_storage(Arc::new(storage.clone()), StoreConfig::default());
        assert!(matches!(second, Err(NearwordError::LogLocked(_))));

        first.close().unwrap();
        assert!(Store::with_storage(Arc::new(storage), StoreConfig::default()).is_ok());
    }

    #[test]
    fn test_insert_after_close_fails() {
        let store = memory_store(&MemoryStorage::new());
        store.insert("ab").unwrap();
        store.close().unwrap();
        store.close().unwrap();

        assert!(store.insert("cd").is_err());
        assert_eq!(store.query_by_value(3).as_deref(), Some("ab"));
    }

    #[test]
    fn test_store_error_display_for_lock() {
        let err: NearwordError = StorageError::LockFailed("logs.txt".into()).into();
        assert_eq!(err.to_string(), "Log is locked: logs.txt");
    }
}
