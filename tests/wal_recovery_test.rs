use std::fs;
use std::io::Write;

use nearword::config::{StoreConfig, SyncPolicy};
use nearword::error::Result;
use nearword::fingerprint::compute_fingerprints;
use nearword::store::Store;
use tempfile::TempDir;

fn config_for(dir: &TempDir) -> StoreConfig {
    StoreConfig::builder()
        .data_dir(dir.path())
        .sync_policy(SyncPolicy::Always)
        .build()
        .unwrap()
}

#[test]
fn test_recovery_after_close() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let words = ["apple", "banana", "cherry", "ab", "ba", "zzz"];
    let probes_value = [0, 3, 10, 30, 60, 1000];
    let probes_lexical = [0.0, 0.05, 0.1, 0.5, 0.9, 2.0];

    // "First Run": store words and record the answers
    let (before_value, before_lexical) = {
        let store = Store::open(config_for(&temp_dir))?;
        for word in words {
            store.insert(word)?;
        }

        let value: Vec<_> = probes_value.iter().map(|&q| store.query_by_value(q)).collect();
        let lexical: Vec<_> = probes_lexical
            .iter()
            .map(|&q| store.query_by_lexical(q))
            .collect();
        store.close()?;
        (value, lexical)
    };

    // "Restart": answers must match
    {
        let store = Store::open(config_for(&temp_dir))?;
        assert_eq!(store.stats().replayed, words.len());

        let value: Vec<_> = probes_value.iter().map(|&q| store.query_by_value(q)).collect();
        let lexical: Vec<_> = probes_lexical
            .iter()
            .map(|&q| store.query_by_lexical(q))
            .collect();
        assert_eq!(value, before_value);
        assert_eq!(lexical, before_lexical);

        // "ba" came after "ab", so it still owns key 3
        assert_eq!(store.query_by_value(3).as_deref(), Some("ba"));
    }

    Ok(())
}

#[test]
fn test_recovery_without_close() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();

    {
        let store = Store::open(config_for(&temp_dir))?;
        store.handle("hello")?;
        store.handle("world")?;
        // Dropped without close
    }

    let store = Store::open(config_for(&temp_dir))?;
    assert_eq!(store.stats().replayed, 2);

    let result = store.handle("hello")?;
    assert_eq!(result.closest_by_value.as_deref(), Some("hello"));
    assert_eq!(result.closest_lexically.as_deref(), Some("hello"));

    Ok(())
}

#[test]
fn test_log_file_format() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    {
        let store = Store::open(config_for(&temp_dir))?;
        store.insert("abc")?;
        store.close()?;
    }

    let content = fs::read_to_string(temp_dir.path().join("logs.txt")).unwrap();
    let lexical = compute_fingerprints("abc").lexical;
    assert_eq!(content, format!("abc {lexical} 6\n"));

    Ok(())
}

#[test]
fn test_lenient_replay_skips_malformed_lines() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let lexical = compute_fingerprints("ab").lexical;
    fs::write(
        temp_dir.path().join("logs.txt"),
        format!("ab {lexical} 3\nbroken 0.5\n"),
    )
    .unwrap();

    let store = Store::open(config_for(&temp_dir))?;
    assert_eq!(store.stats().replayed, 1);
    assert_eq!(store.query_by_value(100).as_deref(), Some("ab"));

    Ok(())
}

#[test]
fn test_garbage_lines_are_ignored() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let mut file = fs::File::create(temp_dir.path().join("logs.txt")).unwrap();
    file.write_all(b"\n").unwrap();
    file.write_all(b"one two three four\n").unwrap();
    file.write_all(b"word notanumber 3\n").unwrap();
    file.write_all(&[0xff, 0xfe, b' ', b'1', b' ', b'2', b'\n'])
        .unwrap();
    file.write_all(b"zz 1.0384615384615385 52\n").unwrap();
    drop(file);

    let store = Store::open(config_for(&temp_dir))?;
    assert_eq!(store.stats().replayed, 1);
    assert_eq!(store.query_by_value(0).as_deref(), Some("zz"));

    Ok(())
}

#[test]
fn test_torn_tail_does_not_swallow_next_record() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let lexical = compute_fingerprints("ab").lexical;
    fs::write(
        temp_dir.path().join("logs.txt"),
        format!("ab {lexical} 3\nhalf 0.3"),
    )
    .unwrap();

    {
        let store = Store::open(config_for(&temp_dir))?;
        assert_eq!(store.stats().replayed, 1);
        store.insert("zzz")?;
        store.close()?;
    }

    let store = Store::open(config_for(&temp_dir))?;
    assert_eq!(store.stats().replayed, 2);
    assert_eq!(store.query_by_value(78).as_deref(), Some("zzz"));

    Ok(())
}

#[test]
fn test_second_open_is_refused_until_close() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let first = Store::open(config_for(&temp_dir))?;

    let second = Store::open(config_for(&temp_dir));
    assert!(second.is_err());

    first.close()?;
    let reopened = Store::open(config_for(&temp_dir))?;
    reopened.insert("again")?;

    Ok(())
}
