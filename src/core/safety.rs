//! Input-size limits for verification.
//!
//! Every scan the engine performs is bounded by the size of its inputs.
//! Oversized inputs are refused with [`SafetyViolation::InputTooLarge`]
//! rather than truncated, so callers can tell "not found" apart from
//! "refused to search".

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{Claim, SourceLayout};

/// Size bounds on engine inputs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetyLimits {
    /// Maximum bytes of claim text: phrase, anchor and custom phrase (default: 16KB)
    #[serde(default = "default_max_phrase_bytes")]
    pub max_phrase_bytes: usize,

    /// Maximum bytes of extracted text across the layout (default: 10MB)
    #[serde(default = "default_max_document_bytes")]
    pub max_document_bytes: usize,

    /// Maximum bytes accepted by word counting (default: 1MB)
    #[serde(default = "default_max_word_count_bytes")]
    pub max_word_count_bytes: usize,
}

fn default_max_phrase_bytes() -> usize {
    16 * 1024
}
fn default_max_document_bytes() -> usize {
    10 * 1024 * 1024
}
fn default_max_word_count_bytes() -> usize {
    1024 * 1024
}

impl Default for SafetyLimits {
    fn default() -> Self {
        Self {
            max_phrase_bytes: default_max_phrase_bytes(),
            max_document_bytes: default_max_document_bytes(),
            max_word_count_bytes: default_max_word_count_bytes(),
        }
    }
}

impl SafetyLimits {
    /// Validate the claim's searchable text
    pub fn validate_claim(&self, claim: &Claim) -> Result<(), SafetyViolation> {
        let size = claim.expected_phrase.len()
            + claim.anchor_text.as_ref().map_or(0, String::len)
            + claim.custom_phrase.as_ref().map_or(0, String::len);
        check(LimitedInput::Phrase, size, self.max_phrase_bytes)
    }

    /// Validate the total extracted text of a layout
    pub fn validate_document(&self, layout: &SourceLayout) -> Result<(), SafetyViolation> {
        check(LimitedInput::Document, layout.text_bytes(), self.max_document_bytes)
    }

    /// Validate input to word counting
    pub fn validate_word_input(&self, text: &str) -> Result<(), SafetyViolation> {
        check(LimitedInput::WordCount, text.len(), self.max_word_count_bytes)
    }
}

fn check(input: LimitedInput, actual: usize, limit: usize) -> Result<(), SafetyViolation> {
    if actual > limit {
        return Err(SafetyViolation::InputTooLarge {
            input,
            actual,
            limit,
        });
    }
    Ok(())
}

/// Which bounded input was exceeded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LimitedInput {
    Phrase,
    Document,
    WordCount,
}

impl fmt::Display for LimitedInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LimitedInput::Phrase => "claim text",
            LimitedInput::Document => "document text",
            LimitedInput::WordCount => "word count input",
        };
        f.write_str(name)
    }
}

/// Safety violation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SafetyViolation {
    #[error("Input too large: {input} is {actual} bytes, limit {limit}")]
    InputTooLarge {
        input: LimitedInput,
        actual: usize,
        limit: usize,
    },
}
