//! Builds the ordered strategy plan for a claim.
//!
//! The plan is derived up front from the claim, the layout's shape and the
//! search settings; executing it is the resolver's job. Strategies that
//! cannot apply (no expected page, no expected lines, a fragment that is
//! empty or identical to the phrase) are left out of the plan and never
//! appear in the attempt trail.

use super::attempt::{LineRange, SearchScope, SearchTarget};
use super::method::SearchMethod;
use crate::config::SearchSettings;
use crate::domain::Claim;

/// Text a strategy searches for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub kind: SearchTarget,
    pub text: String,
}

/// Pages and lines a strategy covers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    pub kind: SearchScope,
    /// 1-based pages in visiting order
    pub pages: Vec<u32>,
    pub lines: Option<LineRange>,
}

impl Scope {
    fn page(page: u32, lines: Option<LineRange>) -> Self {
        Self {
            kind: SearchScope::Page,
            pages: vec![page],
            lines,
        }
    }

    fn document(pages: Vec<u32>, lines: Option<LineRange>) -> Self {
        Self {
            kind: SearchScope::Document,
            pages,
            lines,
        }
    }

    /// The single page searched, when the scope is one page
    pub fn page_searched(&self) -> Option<u32> {
        match self.pages.as_slice() {
            [page] => Some(*page),
            _ => None,
        }
    }
}

/// One planned strategy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Strategy {
    pub method: SearchMethod,
    pub scope: Scope,
    /// Tried in order; the first target that matches wins
    pub targets: Vec<Target>,
    /// Compile targets to whitespace-tolerant patterns
    pub use_pattern: bool,
}

/// Ordered plan for `claim` over a layout with `page_count` pages
pub fn plan(claim: &Claim, page_count: u32, settings: &SearchSettings) -> Vec<Strategy> {
    let phrase = claim.expected_phrase.trim();
    let anchor = claim.distinct_anchor();

    let phrase_only = vec![target(SearchTarget::Phrase, phrase)];
    let mut phrase_then_anchor = phrase_only.clone();
    if let Some(anchor) = anchor {
        phrase_then_anchor.push(target(SearchTarget::Anchor, anchor));
    }

    let mut strategies = Vec::new();
    let mut push = |method: SearchMethod, scope: Scope, targets: Vec<Target>| {
        if !scope.pages.is_empty() && !targets.is_empty() {
            strategies.push(Strategy {
                method,
                scope,
                targets,
                use_pattern: method == SearchMethod::FullDocument,
            });
        }
    };

    let expected_page = claim
        .expected_page
        .filter(|p| (1..=page_count).contains(p));

    if let Some(page) = expected_page {
        if let Some((first, last)) = claim.expected_line_span() {
            let widen = |radius: u32| {
                Some(LineRange::new(first.saturating_sub(radius).max(1), last.saturating_add(radius)))
            };
            push(
                SearchMethod::ExactLineMatch,
                Scope::page(page, widen(0)),
                phrase_only.clone(),
            );
            push(
                SearchMethod::NearbyLines,
                Scope::page(page, widen(settings.nearby_line_radius)),
                phrase_only.clone(),
            );
            push(
                SearchMethod::ExpandedLineBuffer,
                Scope::page(page, widen(settings.expanded_line_radius)),
                phrase_only.clone(),
            );
        }

        push(SearchMethod::CurrentPage, Scope::page(page, None), phrase_only.clone());

        if let Some(anchor) = anchor {
            push(
                SearchMethod::AnchorTextFallback,
                Scope::page(page, None),
                vec![target(SearchTarget::Anchor, anchor)],
            );
        }

        let adjacent_lines = claim.expected_line_span().map(|(first, last)| {
            let radius = settings.nearby_line_radius;
            LineRange::new(first.saturating_sub(radius).max(1), last.saturating_add(radius))
        });
        push(
            SearchMethod::AdjacentPages,
            Scope::document(
                pages_around(page, settings.adjacent_page_radius, page_count),
                adjacent_lines,
            ),
            phrase_then_anchor.clone(),
        );
        push(
            SearchMethod::ExpandedWindow,
            Scope::document(
                pages_around(page, settings.expanded_page_window, page_count),
                None,
            ),
            phrase_then_anchor.clone(),
        );
    }

    let document = locality_order(expected_page, page_count);
    push(
        SearchMethod::FullDocument,
        Scope::document(document.clone(), None),
        phrase_then_anchor,
    );

    for (method, fragment) in structural_fragments(phrase) {
        let fragment = Some(fragment).filter(|f| !f.eq_ignore_ascii_case(phrase));
        if let Some(fragment) = fragment {
            push(
                method,
                Scope::document(document.clone(), None),
                vec![target(SearchTarget::Fragment, &fragment)],
            );
        }
    }

    if let Some(custom) = claim.custom_phrase.as_deref().map(str::trim) {
        if !custom.is_empty() {
            push(
                SearchMethod::CustomPhraseFallback,
                Scope::document(document.clone(), None),
                vec![target(SearchTarget::Fragment, custom)],
            );
        }
    }

    let key_span = key_span(anchor.unwrap_or(phrase), settings.key_span_words);
    let redundant = key_span.eq_ignore_ascii_case(phrase)
        || anchor.is_some_and(|a| key_span.eq_ignore_ascii_case(a));
    if !key_span.is_empty() && !redundant {
        push(
            SearchMethod::KeySpanFallback,
            Scope::document(document, None),
            vec![target(SearchTarget::Fragment, &key_span)],
        );
    }

    strategies
}

fn target(kind: SearchTarget, text: &str) -> Target {
    Target {
        kind,
        text: text.to_string(),
    }
}

/// Neighbours of `page` within `radius`, nearest first
fn pages_around(page: u32, radius: u32, page_count: u32) -> Vec<u32> {
    let mut pages = Vec::new();
    for distance in 1..=radius {
        if let Some(before) = page.checked_sub(distance).filter(|p| *p >= 1) {
            pages.push(before);
        }
        let after = page.saturating_add(distance);
        if after <= page_count {
            pages.push(after);
        }
    }
    pages
}

/// Every page, the expected one first and the rest by distance from it
pub fn locality_order(expected_page: Option<u32>, page_count: u32) -> Vec<u32> {
    let mut pages: Vec<u32> = (1..=page_count).collect();
    if let Some(expected) = expected_page {
        pages.sort_by_key(|p| (p.abs_diff(expected), *p));
    }
    pages
}

/// Pieces of the phrase tried by the structural fallbacks, in method order
fn structural_fragments(phrase: &str) -> Vec<(SearchMethod, String)> {
    let words: Vec<&str> = phrase.split_whitespace().collect();
    if words.len() < 2 {
        return Vec::new();
    }

    let join = |slice: &[&str]| slice.join(" ");
    let mut fragments = vec![(SearchMethod::FirstWordFallback, words[0].to_string())];

    if let Some(longest) = words
        .iter()
        .copied()
        .reduce(|best, w| if w.chars().count() > best.chars().count() { w } else { best })
    {
        fragments.push((SearchMethod::LongestWordFallback, longest.to_string()));
    }

    let half = words.len().div_ceil(2);
    fragments.push((SearchMethod::FirstHalfFallback, join(&words[..half])));
    fragments.push((SearchMethod::LastHalfFallback, join(&words[half..])));

    if words.len() >= 4 {
        let quarter_methods = [
            SearchMethod::FirstQuarterFallback,
            SearchMethod::SecondQuarterFallback,
            SearchMethod::ThirdQuarterFallback,
            SearchMethod::FourthQuarterFallback,
        ];
        for (i, method) in quarter_methods.into_iter().enumerate() {
            let start = words.len() * i / 4;
            let end = words.len() * (i + 1) / 4;
            fragments.push((method, join(&words[start..end])));
        }
    }

    fragments
}

/// Leading `count` words of `text`
fn key_span(text: &str, count: usize) -> String {
    text.split_whitespace().take(count).collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn methods(plan: &[Strategy]) -> Vec<SearchMethod> {
        plan.iter().map(|s| s.method).collect()
    }

    #[test]
    fn test_full_plan_is_in_priority_order() {
        let claim = Claim::new("revenue increased by twelve percent in the fourth quarter")
            .with_anchor("twelve percent in the fourth quarter")
            .with_custom_phrase("revenue increased")
            .on_page(3)
            .on_lines([10, 11]);
        let plan = plan(&claim, 10, &SearchSettings::default());
        let order = methods(&plan);

        assert!(order.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(order.len(), SearchMethod::ALL.len());
        assert_eq!(plan[0].scope.lines, Some(LineRange::new(10, 11)));
        assert_eq!(plan[1].scope.lines, Some(LineRange::new(8, 13)));
        assert_eq!(plan[2].scope.lines, Some(LineRange::new(1, 21)));
    }

    #[test]
    fn test_no_expected_page_starts_at_document_scan() {
        let claim = Claim::new("a short phrase").with_anchor("short");
        let plan = plan(&claim, 4, &SearchSettings::default());
        assert_eq!(plan[0].method, SearchMethod::FullDocument);
        assert_eq!(plan[0].targets.len(), 2);
        assert_eq!(plan[0].targets[1].kind, SearchTarget::Anchor);
        assert!(plan[0].use_pattern);
    }

    #[test]
    fn test_page_without_lines_skips_line_strategies() {
        let claim = Claim::new("a short phrase").on_page(2);
        let plan = plan(&claim, 4, &SearchSettings::default());
        assert_eq!(plan[0].method, SearchMethod::CurrentPage);
        assert!(!methods(&plan).contains(&SearchMethod::AnchorTextFallback));
    }

    #[test]
    fn test_out_of_range_page_is_ignored() {
        let claim = Claim::new("a short phrase").on_page(9).on_lines([1]);
        let plan = plan(&claim, 3, &SearchSettings::default());
        assert_eq!(plan[0].method, SearchMethod::FullDocument);
    }

    #[test]
    fn test_pages_around_and_locality() {
        assert_eq!(pages_around(1, 1, 5), vec![2]);
        assert_eq!(pages_around(3, 2, 4), vec![2, 4, 1]);
        assert_eq!(locality_order(Some(3), 5), vec![3, 2, 4, 1, 5]);
        assert_eq!(locality_order(None, 3), vec![1, 2, 3]);
    }

    #[test]
    fn test_structural_fragments() {
        let fragments = structural_fragments("one two three four five six seven eight");
        let find = |m: SearchMethod| {
            fragments
                .iter()
                .find(|(method, _)| *method == m)
                .map(|(_, f)| f.as_str())
        };
        assert_eq!(find(SearchMethod::FirstWordFallback), Some("one"));
        assert_eq!(find(SearchMethod::LongestWordFallback), Some("three"));
        assert_eq!(find(SearchMethod::FirstHalfFallback), Some("one two three four"));
        assert_eq!(find(SearchMethod::LastHalfFallback), Some("five six seven eight"));
        assert_eq!(find(SearchMethod::ThirdQuarterFallback), Some("five six"));
        assert!(structural_fragments("single").is_empty());
        assert!(structural_fragments("two words")
            .iter()
            .all(|(m, _)| *m <= SearchMethod::LastHalfFallback));
    }

    #[test]
    fn test_key_span() {
        assert_eq!(key_span("alpha beta gamma delta", 3), "alpha beta gamma");
        assert_eq!(key_span("   ", 3), "");
    }
}
