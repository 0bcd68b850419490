//! The verdict produced for one claim.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::layout::TextItem;
use crate::core::ambiguity::AmbiguityInfo;
use crate::core::safety::{SafetyLimits, SafetyViolation};
use crate::evidence::highlight::should_highlight_anchor;
use crate::search::SearchAttempt;

/// Terminal verdict of a verification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStatus {
    Found,
    FoundAnchorTextOnly,
    FoundPhraseMissedAnchorText,
    FoundOnOtherPage,
    FoundOnOtherLine,
    PartialTextFound,
    FirstWordFound,
    NotFound,
    /// Placeholder for callers that have not run verification yet
    Pending,
    /// Placeholder for callers whose verification is in flight
    Loading,
}

impl SearchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchStatus::Found => "found",
            SearchStatus::FoundAnchorTextOnly => "found_anchor_text_only",
            SearchStatus::FoundPhraseMissedAnchorText => "found_phrase_missed_anchor_text",
            SearchStatus::FoundOnOtherPage => "found_on_other_page",
            SearchStatus::FoundOnOtherLine => "found_on_other_line",
            SearchStatus::PartialTextFound => "partial_text_found",
            SearchStatus::FirstWordFound => "first_word_found",
            SearchStatus::NotFound => "not_found",
            SearchStatus::Pending => "pending",
            SearchStatus::Loading => "loading",
        }
    }

    /// Whether some text was located in the source
    pub fn is_located(&self) -> bool {
        !matches!(
            self,
            SearchStatus::NotFound | SearchStatus::Pending | SearchStatus::Loading
        )
    }
}

impl fmt::Display for SearchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the winning match sits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiedLocation {
    pub page: u32,
    pub lines: Vec<u32>,
}

/// Result of verifying one claim against one layout.
///
/// Built once by the verifier and never updated; re-verifying produces a
/// new value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verification {
    pub status: SearchStatus,
    pub search_attempts: Vec<SearchAttempt>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ambiguity: Option<AmbiguityInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<VerifiedLocation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_deep_item: Option<TextItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor_matched_deep_item: Option<TextItem>,
    /// Source words the phrase match covers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_text: Option<String>,
    /// Source words the anchor match covers, inside `matched_text`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor_matched_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified_match_snippet: Option<String>,
}

impl Verification {
    /// A verdict with no located text
    pub fn not_found(search_attempts: Vec<SearchAttempt>) -> Self {
        Self {
            status: SearchStatus::NotFound,
            search_attempts,
            ambiguity: None,
            location: None,
            matched_deep_item: None,
            anchor_matched_deep_item: None,
            matched_text: None,
            anchor_matched_text: None,
            verified_match_snippet: None,
        }
    }

    pub fn verified_page(&self) -> Option<u32> {
        self.location.as_ref().map(|l| l.page)
    }

    /// The attempt that produced the verdict, if any succeeded
    pub fn winning_attempt(&self) -> Option<&SearchAttempt> {
        self.search_attempts.iter().rev().find(|a| a.success)
    }

    /// The anchor item, when the anchor's matched text is distinct enough
    /// from the phrase's matched text to deserve its own highlight
    pub fn anchor_highlight(
        &self,
        min_word_difference: usize,
        limits: &SafetyLimits,
    ) -> Result<Option<&TextItem>, SafetyViolation> {
        let (Some(phrase), Some(anchor), Some(item)) = (
            self.matched_text.as_deref(),
            self.anchor_matched_text.as_deref(),
            &self.anchor_matched_deep_item,
        ) else {
            return Ok(None);
        };
        let worthy = should_highlight_anchor(phrase, anchor, min_word_difference, limits)?;
        Ok(worthy.then_some(item))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&SearchStatus::FoundPhraseMissedAnchorText).unwrap();
        assert_eq!(json, "\"found_phrase_missed_anchor_text\"");
        assert_eq!(SearchStatus::FirstWordFound.to_string(), "first_word_found");
    }

    #[test]
    fn test_located_statuses() {
        assert!(SearchStatus::Found.is_located());
        assert!(SearchStatus::PartialTextFound.is_located());
        assert!(!SearchStatus::NotFound.is_located());
        assert!(!SearchStatus::Pending.is_located());
    }

    #[test]
    fn test_not_found_omits_optional_fields() {
        let verification = Verification::not_found(vec![SearchAttempt::skipped("", "empty claim phrase")]);
        let value = serde_json::to_value(&verification).unwrap();
        assert_eq!(value["status"], "not_found");
        assert!(value.get("location").is_none());
        assert!(value.get("ambiguity").is_none());
        assert_eq!(value["search_attempts"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_anchor_highlight_compares_matched_text() {
        let limits = SafetyLimits::default();
        let mut verification = Verification::not_found(Vec::new());
        assert_eq!(verification.anchor_highlight(2, &limits).unwrap(), None);

        let line = TextItem::new("Operating margin improved to 18 percent in the quarter", 0.0, 10.0, 300.0, 10.0);
        verification.matched_deep_item = Some(line.clone());
        verification.anchor_matched_deep_item = Some(line);
        verification.matched_text = Some("Operating margin improved to 18 percent".to_string());
        assert_eq!(verification.anchor_highlight(2, &limits).unwrap(), None);

        verification.anchor_matched_text = Some("18 percent".to_string());
        let anchor = verification.anchor_highlight(2, &limits).unwrap();
        assert!(anchor.is_some());

        verification.anchor_matched_text = Some("improved to 18 percent".to_string());
        assert_eq!(verification.anchor_highlight(3, &limits).unwrap(), None);
    }
}
