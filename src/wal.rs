//! Write-Ahead Log (WAL) for stored words.
//!
//! Every record is appended to the log before it becomes visible in memory, so
//! the in-memory indices can always be rebuilt by replaying the log. The log is
//! plain text, one record per line:
//!
//! ```text
//! <word> <lexical fingerprint> <value fingerprint>
//! ```
//!
//! Replay is lenient: a line that does not split into exactly three fields,
//! or whose numbers do not parse, is skipped without an error. There is no
//! checksum, so a damaged line that still has that shape is accepted as data.

use std::io::{BufRead, BufReader, Write};
use std::sync::Arc;

use log::{debug, warn};

use crate::config::SyncPolicy;
use crate::error::Result;
use crate::record::Record;
use crate::storage::{Storage, StorageOutput};

/// Append-only record log on top of a [`Storage`] backend.
#[derive(Debug)]
pub struct WriteAheadLog {
    storage: Arc<dyn Storage>,
    name: String,
    sync_policy: SyncPolicy,
    writer: Option<Box<dyn StorageOutput>>,
    // The file may end in a partial line; the next append starts a fresh one.
    torn_tail: bool,
}

impl WriteAheadLog {
    /// Create a log handle for file `name`. Nothing is opened until the first
    /// append.
    pub fn new(storage: Arc<dyn Storage>, name: &str, sync_policy: SyncPolicy) -> Self {
        Self {
            storage,
            name: name.to_string(),
            sync_policy,
            writer: None,
            torn_tail: false,
        }
    }

    /// The log file name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the append handle is currently open.
    pub fn is_open(&self) -> bool {
        self.writer.is_some()
    }

    /// Bytes in the log as seen by the backend; `0` before the first append.
    ///
    /// Appends still sitting in an unflushed buffer are not counted.
    pub fn size(&self) -> Result<u64> {
        if !self.storage.file_exists(&self.name) {
            return Ok(0);
        }
        self.storage.file_size(&self.name)
    }

    /// Open or create the log file for appending.
    fn ensure_writer(&mut self) -> Result<&mut Box<dyn StorageOutput>> {
        let writer = match self.writer.take() {
            Some(writer) => writer,
            None => {
                debug!("opening log {} for append", self.name);
                self.storage.create_output_append(&self.name)?
            }
        };
        Ok(self.writer.insert(writer))
    }

    /// Durably append one record.
    ///
    /// Returns only after the line has been handed to the backend according to
    /// the sync policy. On failure the handle is dropped and reopened by the
    /// next append.
    pub fn append(&mut self, record: &Record) -> Result<()> {
        let mut line = String::with_capacity(record.word.len() + 32);
        if self.torn_tail {
            line.push('\n');
        }
        line.push_str(&record.to_log_line());

        let sync_policy = self.sync_policy;
        let result = self.ensure_writer().and_then(|writer| {
            writer.write_all(line.as_bytes())?;
            match sync_policy {
                SyncPolicy::Flush => writer.flush()?,
                SyncPolicy::Always => writer.flush_and_sync()?,
            }
            Ok(())
        });

        match result {
            Ok(()) => {
                self.torn_tail = false;
                Ok(())
            }
            Err(e) => {
                // Part of the line may have reached the file.
                self.writer = None;
                self.torn_tail = true;
                Err(e)
            }
        }
    }

    /// Stream every well-formed record to `apply`, in file order.
    ///
    /// Returns the number of records applied. A missing file replays nothing.
    pub fn replay_with<F: FnMut(Record)>(&mut self, mut apply: F) -> Result<usize> {
        if !self.storage.file_exists(&self.name) {
            return Ok(0);
        }

        let input = self.storage.open_input(&self.name)?;
        let mut reader = BufReader::new(input);
        let mut buffer = Vec::new();
        let mut applied = 0;
        let mut ends_with_newline = true;

        loop {
            buffer.clear();
            let read = reader.read_until(b'\n', &mut buffer)?;
            if read == 0 {
                break;
            }
            ends_with_newline = buffer.last() == Some(&b'\n');

            let Ok(line) = std::str::from_utf8(&buffer) else {
                continue;
            };
            if let Some(record) = Record::parse_log_line(line) {
                apply(record);
                applied += 1;
            }
        }

        if !ends_with_newline {
            warn!("log {} ends with a partial line", self.name);
            self.torn_tail = true;
        }

        Ok(applied)
    }

    /// Read every well-formed record, in file order.
    pub fn replay(&mut self) -> Result<Vec<Record>> {
        let mut records = Vec::new();
        self.replay_with(|record| records.push(record))?;
        Ok(records)
    }

    /// Flush and release the append handle. Safe to call when never opened.
    pub fn close(&mut self) -> Result<()> {
        if let Some(mut writer) = self.writer.take() {
            debug!("closing log {}", self.name);
            writer.close()?;
        }
        Ok(())
    }
}

impl Drop for WriteAheadLog {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn memory_log(storage: &MemoryStorage) -> WriteAheadLog {
        WriteAheadLog::new(Arc::new(storage.clone()), "logs.txt", SyncPolicy::Flush)
    }

    fn log_text(storage: &MemoryStorage) -> String {
        String::from_utf8(storage.read_file("logs.txt").unwrap()).unwrap()
    }

    #[test]
    fn test_missing_log_replays_nothing() {
        let storage = MemoryStorage::new();
        let mut wal = memory_log(&storage);

        assert!(wal.replay().unwrap().is_empty());
        assert!(!storage.file_exists("logs.txt"));
    }

    #[test]
    fn test_append_then_replay() {
        let storage = MemoryStorage::new();
        let mut wal = memory_log(&storage);
        assert!(!wal.is_open());

        wal.append(&Record::new("ab", 3, 0.25)).unwrap();
        wal.append(&Record::from_word("hello")).unwrap();
        assert!(wal.is_open());
        assert!(log_text(&storage).starts_with("ab 0.25 3\n"));

        let records = wal.replay().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], Record::new("ab", 3, 0.25));
        assert_eq!(records[1], Record::from_word("hello"));
    }

    #[test]
    fn test_replay_skips_malformed_lines() {
        let storage = MemoryStorage::new();
        let mut bytes = b"ab 0.25 3\nonly 0.5\n\nx y z\n".to_vec();
        bytes.extend_from_slice(&[0xff, b' ', b'1', b' ', b'2', b'\n']);
        bytes.extend_from_slice(b"c 0.1153846 3\n");
        storage.put_file("logs.txt", bytes);

        let records = memory_log(&storage).replay().unwrap();
        assert_eq!(
            records.iter().map(|r| r.word.as_str()).collect::<Vec<_>>(),
            vec!["ab", "c"]
        );
    }

    #[test]
    fn test_torn_tail_gets_its_own_line() {
        let storage = MemoryStorage::new();
        storage.put_file("logs.txt", "ab 0.25 3\nhal");

        let mut wal = memory_log(&storage);
        assert_eq!(wal.replay().unwrap().len(), 1);

        wal.append(&Record::new("cd", 7, 0.5)).unwrap();
        assert_eq!(log_text(&storage), "ab 0.25 3\nhal\ncd 0.5 7\n");

        let records = wal.replay().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].word, "cd");
    }

    #[test]
    fn test_size_follows_appends() {
        let storage = MemoryStorage::new();
        let mut wal = memory_log(&storage);
        assert_eq!(wal.size().unwrap(), 0);

        wal.append(&Record::new("ab", 3, 0.25)).unwrap();
        assert_eq!(wal.size().unwrap(), "ab 0.25 3\n".len() as u64);
    }

    #[test]
    fn test_close_is_idempotent() {
        let storage = MemoryStorage::new();
        let mut wal = memory_log(&storage);
        wal.close().unwrap();

        wal.append(&Record::new("a", 1, 1.0 / 26.0)).unwrap();
        wal.close().unwrap();
        wal.close().unwrap();
        assert!(!wal.is_open());

        // Reopens on demand.
        wal.append(&Record::new("b", 2, 2.0 / 26.0)).unwrap();
        assert_eq!(wal.replay().unwrap().len(), 2);
    }
}
