//! Search strategies, in fixed priority order.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A fallback strategy of the cascading resolver.
///
/// Declaration order is priority order (most specific and cheapest first);
/// `Ord` follows it and the resolver relies on that.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMethod {
    /// Expected lines on the expected page
    ExactLineMatch,
    /// Expected lines widened by a small radius
    NearbyLines,
    /// Expected lines widened by a large radius
    ExpandedLineBuffer,
    /// Every line of the expected page
    CurrentPage,
    /// Anchor text alone on the expected page
    AnchorTextFallback,
    /// Pages next to the expected page, same line offsets
    AdjacentPages,
    /// A wider window of pages around the expected page
    ExpandedWindow,
    /// Regex scan over the whole document
    FullDocument,
    FirstWordFallback,
    LongestWordFallback,
    FirstHalfFallback,
    LastHalfFallback,
    FirstQuarterFallback,
    SecondQuarterFallback,
    ThirdQuarterFallback,
    FourthQuarterFallback,
    /// Caller-supplied substitute phrase
    CustomPhraseFallback,
    /// Leading words of the anchor (or phrase)
    KeySpanFallback,
}

impl SearchMethod {
    /// Every method in priority order
    pub const ALL: [SearchMethod; 18] = [
        SearchMethod::ExactLineMatch,
        SearchMethod::NearbyLines,
        SearchMethod::ExpandedLineBuffer,
        SearchMethod::CurrentPage,
        SearchMethod::AnchorTextFallback,
        SearchMethod::AdjacentPages,
        SearchMethod::ExpandedWindow,
        SearchMethod::FullDocument,
        SearchMethod::FirstWordFallback,
        SearchMethod::LongestWordFallback,
        SearchMethod::FirstHalfFallback,
        SearchMethod::LastHalfFallback,
        SearchMethod::FirstQuarterFallback,
        SearchMethod::SecondQuarterFallback,
        SearchMethod::ThirdQuarterFallback,
        SearchMethod::FourthQuarterFallback,
        SearchMethod::CustomPhraseFallback,
        SearchMethod::KeySpanFallback,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SearchMethod::ExactLineMatch => "exact_line_match",
            SearchMethod::NearbyLines => "nearby_lines",
            SearchMethod::ExpandedLineBuffer => "expanded_line_buffer",
            SearchMethod::CurrentPage => "current_page",
            SearchMethod::AnchorTextFallback => "anchor_text_fallback",
            SearchMethod::AdjacentPages => "adjacent_pages",
            SearchMethod::ExpandedWindow => "expanded_window",
            SearchMethod::FullDocument => "full_document",
            SearchMethod::FirstWordFallback => "first_word_fallback",
            SearchMethod::LongestWordFallback => "longest_word_fallback",
            SearchMethod::FirstHalfFallback => "first_half_fallback",
            SearchMethod::LastHalfFallback => "last_half_fallback",
            SearchMethod::FirstQuarterFallback => "first_quarter_fallback",
            SearchMethod::SecondQuarterFallback => "second_quarter_fallback",
            SearchMethod::ThirdQuarterFallback => "third_quarter_fallback",
            SearchMethod::FourthQuarterFallback => "fourth_quarter_fallback",
            SearchMethod::CustomPhraseFallback => "custom_phrase_fallback",
            SearchMethod::KeySpanFallback => "key_span_fallback",
        }
    }

    /// Methods confined to specific lines of the expected page
    pub fn is_line_scoped(&self) -> bool {
        matches!(
            self,
            SearchMethod::ExactLineMatch | SearchMethod::NearbyLines | SearchMethod::ExpandedLineBuffer
        )
    }

    /// Methods that search a fragment of the claim rather than the claim itself
    pub fn is_structural(&self) -> bool {
        *self >= SearchMethod::FirstWordFallback
    }
}

impl fmt::Display for SearchMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
