//! Word fingerprints.
//!
//! Every word maps to two numbers:
//!
//! - the **value fingerprint**, the sum of the alphabet positions of its
//!   letters (`a` = 1 ... `z` = 26), and
//! - the **lexical fingerprint**, a base-26 fraction
//!   `sum((pos(c_i) / 26) / 26^i)` in which earlier letters dominate.
//!
//! The lexical fingerprint approximates dictionary order. It is not an exact
//! isomorphism: long words lose their tail to `f64` precision, and a word and
//! its extension by `a...` may land on neighbouring rather than ordered keys.

use crate::error::{NearwordError, Result};

const ALPHABET_SIZE: f64 = 26.0;

/// The two fingerprints of a word.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fingerprints {
    /// Sum of alphabet positions.
    pub value: u64,
    /// Base-26 fractional encoding.
    pub lexical: f64,
}

/// 1-based alphabet position of a lowercase ASCII letter.
#[inline]
fn alphabet_position(byte: u8) -> u64 {
    u64::from(byte - b'a' + 1)
}

/// Compute both fingerprints of `word`.
///
/// The word is expected to pass [`validate_word`]; other input yields
/// meaningless (but not panicking) numbers for non-letter bytes at or above
/// `a`, and is rejected by the store before it reaches this function.
pub fn compute_fingerprints(word: &str) -> Fingerprints {
    let mut value = 0u64;
    let mut lexical = 0.0f64;
    let mut scale = 1.0f64;

    for byte in word.bytes() {
        let position = alphabet_position(byte.max(b'a'));
        value += position;
        lexical += (position as f64 / ALPHABET_SIZE) / scale;
        scale *= ALPHABET_SIZE;
    }

    Fingerprints { value, lexical }
}

/// Check that `word` is a non-empty run of lowercase ASCII letters.
pub fn validate_word(word: &str) -> Result<()> {
    if word.is_empty() {
        return Err(NearwordError::invalid_word("word must not be empty"));
    }
    if let Some(bad) = word.chars().find(|c| !c.is_ascii_lowercase()) {
        return Err(NearwordError::invalid_word(format!(
            "'{word}' contains {bad:?}; only lowercase ASCII letters are allowed"
        )));
    }
    Ok(())
}
