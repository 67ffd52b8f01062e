//! Log records and their on-disk line format.

use serde::{Deserialize, Serialize};

use crate::fingerprint::compute_fingerprints;

/// A word together with its fingerprints.
///
/// On disk a record is one line: `<word> <lexical> <value>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub word: String,
    pub value_fingerprint: u64,
    pub lexical_fingerprint: f64,
}

impl Record {
    pub fn new(word: impl Into<String>, value_fingerprint: u64, lexical_fingerprint: f64) -> Self {
        Self {
            word: word.into(),
            value_fingerprint,
            lexical_fingerprint,
        }
    }

    /// Build a record by fingerprinting `word`.
    pub fn from_word(word: impl Into<String>) -> Self {
        let word = word.into();
        let fingerprints = compute_fingerprints(&word);
        Self::new(word, fingerprints.value, fingerprints.lexical)
    }

    /// Serialize as a log line, including the trailing newline.
    ///
    /// `f64` uses the shortest representation that parses back to the same
    /// bits, so replay reproduces the exact key.
    pub fn to_log_line(&self) -> String {
        format!(
            "{} {} {}\n",
            self.word, self.lexical_fingerprint, self.value_fingerprint
        )
    }

    /// Parse one log line (without its newline).
    ///
    /// Returns `None` unless the line has exactly three whitespace-separated
    /// fields and both numeric fields parse.
    pub fn parse_log_line(line: &str) -> Option<Self> {
        let mut fields = line.split_ascii_whitespace();
        let word = fields.next()?;
        let lexical = fields.next()?;
        let value = fields.next()?;
        if fields.next().is_some() {
            return None;
        }

        Some(Self::new(word, value.parse().ok()?, lexical.parse().ok()?))
    }
}
