//! Status derivation from the attempt trail.
//!
//! Rules apply in priority order and every input maps to exactly one
//! status.

use crate::domain::{Claim, SearchStatus};
use crate::search::{AnchorMatch, SearchAttempt, SearchMethod, SearchTarget, Winner};

/// Derive the verdict for a claim from its trail and winner
pub fn assemble(claim: &Claim, attempts: &[SearchAttempt], winner: Option<&Winner>) -> SearchStatus {
    let Some(winner) = winner else {
        return SearchStatus::NotFound;
    };

    let phrase_matched = attempts
        .iter()
        .any(|a| a.success && a.search_target == SearchTarget::Phrase);
    if winner.target == SearchTarget::Anchor && !phrase_matched {
        return SearchStatus::FoundAnchorTextOnly;
    }

    if winner.target == SearchTarget::Phrase && matches!(winner.anchor, AnchorMatch::Missed) {
        return SearchStatus::FoundPhraseMissedAnchorText;
    }

    if let Some(expected_page) = claim.expected_page {
        if winner.hit.page != expected_page {
            return SearchStatus::FoundOnOtherPage;
        }
        let on_expected_line = winner.hit.lines.iter().any(|l| claim.expected_lines.contains(l));
        if !claim.expected_lines.is_empty() && !on_expected_line {
            return SearchStatus::FoundOnOtherLine;
        }
    }

    let method = attempts
        .get(winner.attempt)
        .map(|a| a.method)
        .unwrap_or(SearchMethod::FullDocument);
    match method {
        SearchMethod::FirstWordFallback => SearchStatus::FirstWordFound,
        m if m.is_structural() => SearchStatus::PartialTextFound,
        _ => SearchStatus::Found,
    }
}
