//! Records of individual search attempts.
//!
//! Attempts are appended to the trail in execution order and never
//! modified afterwards.

use serde::{Deserialize, Serialize};

use super::method::SearchMethod;
use crate::normalize::VariationType;

/// Breadth of the region an attempt covered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchScope {
    Page,
    Document,
}

/// Which text an attempt searched for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchTarget {
    /// The full expected phrase
    Phrase,
    /// The claim's anchor text
    Anchor,
    /// A piece or substitute of the phrase
    Fragment,
}

/// Inclusive 1-based line range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRange {
    pub start: u32,
    pub end: u32,
}

impl LineRange {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, line: u32) -> bool {
        self.start <= line && line <= self.end
    }
}

/// Where an attempt found its text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoundLocation {
    pub page: u32,
    /// Lines the match touches, ascending
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lines: Vec<u32>,
}

impl FoundLocation {
    /// First line of the match
    pub fn line(&self) -> Option<u32> {
        self.lines.first().copied()
    }
}

/// Outcome of one strategy for one search target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchAttempt {
    pub method: SearchMethod,
    pub search_phrase: String,
    pub search_target: SearchTarget,
    pub search_scope: SearchScope,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_searched: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_searched: Option<LineRange>,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_variation: Option<VariationType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub found_location: Option<FoundLocation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl SearchAttempt {
    /// A record for a call that could not search at all
    pub fn skipped(search_phrase: &str, note: impl Into<String>) -> Self {
        Self {
            method: SearchMethod::FullDocument,
            search_phrase: search_phrase.to_string(),
            search_target: SearchTarget::Phrase,
            search_scope: SearchScope::Document,
            page_searched: None,
            line_searched: None,
            success: false,
            matched_variation: None,
            found_location: None,
            note: Some(note.into()),
        }
    }
}
