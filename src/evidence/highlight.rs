//! Word counting and the anchor sub-highlight policy.

use lazy_static::lazy_static;
use regex::Regex;

use crate::core::safety::{SafetyLimits, SafetyViolation};

lazy_static! {
    static ref WORD_SEPARATOR: Regex = Regex::new(r"\s+").unwrap();
}

/// Number of whitespace-separated words, with the default size bound
pub fn word_count(text: &str) -> Result<usize, SafetyViolation> {
    word_count_with_limits(text, &SafetyLimits::default())
}

/// Number of whitespace-separated words.
///
/// Input over `max_word_count_bytes` is refused before any splitting.
pub fn word_count_with_limits(text: &str, limits: &SafetyLimits) -> Result<usize, SafetyViolation> {
    limits.validate_word_input(text)?;
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    Ok(WORD_SEPARATOR.split(trimmed).count())
}

/// Whether the anchor deserves its own highlight inside the phrase highlight.
///
/// Only when the matched texts differ ignoring case and the phrase has at
/// least `min_word_difference` more words than the anchor.
pub fn should_highlight_anchor(
    phrase_text: &str,
    anchor_text: &str,
    min_word_difference: usize,
    limits: &SafetyLimits,
) -> Result<bool, SafetyViolation> {
    let phrase = phrase_text.trim();
    let anchor = anchor_text.trim();
    if anchor.is_empty() || phrase.to_lowercase() == anchor.to_lowercase() {
        return Ok(false);
    }

    let phrase_words = word_count_with_limits(phrase, limits)?;
    let anchor_words = word_count_with_limits(anchor, limits)?;
    Ok(phrase_words.saturating_sub(anchor_words) >= min_word_difference)
}
