//! Ambiguity detection for a winning match.
//!
//! Once the cascade has a winner, the matched canonical text is counted
//! across the whole document using the same variation that produced the
//! win. More than one occurrence means the citation could point at any of
//! them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::AmbiguitySettings;
use crate::domain::Claim;
use crate::search::{Hit, LayoutIndex, SearchMethod};

/// How much to trust that the located occurrence is the cited one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Confidence::High => "high",
            Confidence::Medium => "medium",
            Confidence::Low => "low",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmbiguityInfo {
    pub total_occurrences: usize,
    pub occurrences_on_expected_page: usize,
    pub confidence: Confidence,
    pub note: String,
}

/// Confidence for a match seen `total` times, won by `method`
pub fn confidence(total: usize, method: SearchMethod, medium_max_occurrences: usize) -> Confidence {
    if total <= 1 {
        Confidence::High
    } else if total <= medium_max_occurrences || method.is_line_scoped() {
        Confidence::Medium
    } else {
        Confidence::Low
    }
}

/// Count the winning match across the document.
///
/// Returns `None` when the match is unique. The expected page falls back
/// to the page of the hit when the claim does not name one.
pub fn detect(
    hit: &Hit,
    method: SearchMethod,
    claim: &Claim,
    index: &LayoutIndex<'_>,
    settings: &AmbiguitySettings,
) -> Option<AmbiguityInfo> {
    let total = index.count(&hit.matcher, hit.variation, None);
    if total <= 1 {
        return None;
    }

    let expected_page = claim.expected_page.unwrap_or(hit.page);
    let on_expected_page = index.count(&hit.matcher, hit.variation, Some(expected_page));
    let confidence = confidence(total, method, settings.medium_max_occurrences);

    Some(AmbiguityInfo {
        total_occurrences: total,
        occurrences_on_expected_page: on_expected_page,
        confidence,
        note: format!(
            "matched text occurs {} times in the document, {} on page {}",
            total, on_expected_page, expected_page
        ),
    })
}
