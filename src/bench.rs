//! Throughput measurement over random words.

use std::time::Instant;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::store::Store;

/// Shortest generated word.
pub const MIN_WORD_LEN: usize = 5;
/// Longest generated word, exclusive.
pub const MAX_WORD_LEN: usize = 15;

/// Outcome of a throughput run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThroughputReport {
    pub queries: usize,
    pub elapsed_ms: u64,
    pub queries_per_second: f64,
}

/// Generate `count` random lowercase words of length 5..15.
pub fn generate_words<R: Rng>(count: usize, rng: &mut R) -> Vec<String> {
    (0..count)
        .map(|_| {
            let len = rng.random_range(MIN_WORD_LEN..MAX_WORD_LEN);
            (0..len)
                .map(|_| char::from(rng.random_range(b'a'..=b'z')))
                .collect()
        })
        .collect()
}

/// Time `Store::handle` over every word. Opening the store is not timed.
pub fn measure_throughput(store: &Store, words: &[String]) -> Result<ThroughputReport> {
    let start = Instant::now();
    for word in words {
        store.handle(word)?;
    }
    let elapsed = start.elapsed();

    let seconds = elapsed.as_secs_f64();
    Ok(ThroughputReport {
        queries: words.len(),
        elapsed_ms: elapsed.as_millis() as u64,
        queries_per_second: if seconds > 0.0 {
            words.len() as f64 / seconds
        } else {
            0.0
        },
    })
}
