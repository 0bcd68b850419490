//! Cascading search resolver.
//!
//! Executes the strategy plan strictly in order and stops at the first
//! success. The trail is built by a fold that breaks on the first hit, so
//! no attempt of lower priority than the winner is ever recorded.

use std::ops::{ControlFlow, Range};

use tracing::debug;

use super::attempt::{FoundLocation, LineRange, SearchAttempt, SearchTarget};
use super::index::{LayoutIndex, Matcher};
use super::strategy::{self, Strategy, Target};
use crate::config::SearchSettings;
use crate::domain::Claim;
use crate::normalize::{canonicalize, VariationType};

/// A located occurrence
#[derive(Debug, Clone)]
pub struct Hit {
    pub page: u32,
    /// Lines the occurrence touches, ascending
    pub lines: Vec<u32>,
    /// Byte range in the page's canonical text at `variation`
    pub span: Range<usize>,
    pub variation: VariationType,
    /// The canonical needle that matched, reused for occurrence counting
    pub matcher: Matcher,
}

impl Hit {
    fn line_range(&self) -> Option<LineRange> {
        let first = *self.lines.first()?;
        let last = *self.lines.last()?;
        Some(LineRange::new(first, last))
    }
}

/// Whether the anchor could be placed inside a winning phrase match
#[derive(Debug, Clone)]
pub enum AnchorMatch {
    /// No distinct anchor, or the winner was not the full phrase
    NotRequested,
    Located(Hit),
    Missed,
}

/// The successful attempt and what it found
#[derive(Debug, Clone)]
pub struct Winner {
    /// Index of the winning attempt in the trail
    pub attempt: usize,
    pub target: SearchTarget,
    pub hit: Hit,
    pub anchor: AnchorMatch,
}

/// Attempt trail plus the winner, if any
#[derive(Debug, Clone)]
pub struct Resolution {
    pub attempts: Vec<SearchAttempt>,
    pub winner: Option<Winner>,
}

impl Resolution {
    pub fn winning_attempt(&self) -> Option<&SearchAttempt> {
        self.winner
            .as_ref()
            .and_then(|w| self.attempts.get(w.attempt))
    }
}

/// Run the cascade for `claim` over the indexed layout
pub fn resolve(claim: &Claim, index: &LayoutIndex<'_>, settings: &SearchSettings) -> Resolution {
    let plan = strategy::plan(claim, index.page_count(), settings);

    let outcome = plan
        .iter()
        .flat_map(|strategy| strategy.targets.iter().map(move |target| (strategy, target)))
        .try_fold(Vec::new(), |mut trail, (strategy, target)| {
            let (attempt, hit) = execute(strategy, target, index);
            debug!(
                method = %attempt.method,
                target = ?attempt.search_target,
                success = attempt.success,
                variation = ?attempt.matched_variation,
                "search attempt"
            );
            trail.push(attempt);
            match hit {
                Some(hit) => ControlFlow::Break((trail, target.kind, hit)),
                None => ControlFlow::Continue(trail),
            }
        });

    match outcome {
        ControlFlow::Continue(attempts) => Resolution {
            attempts,
            winner: None,
        },
        ControlFlow::Break((attempts, target, hit)) => {
            let anchor = match target {
                SearchTarget::Phrase => locate_anchor(claim, &hit, index),
                SearchTarget::Anchor | SearchTarget::Fragment => AnchorMatch::NotRequested,
            };
            let winner = Winner {
                attempt: attempts.len() - 1,
                target,
                hit,
                anchor,
            };
            Resolution {
                attempts,
                winner: Some(winner),
            }
        }
    }
}

/// Try one target under every variation, strictest first, over the
/// strategy's scope
fn execute(strategy: &Strategy, target: &Target, index: &LayoutIndex<'_>) -> (SearchAttempt, Option<Hit>) {
    let scope = &strategy.scope;
    let mut attempt = SearchAttempt {
        method: strategy.method,
        search_phrase: target.text.clone(),
        search_target: target.kind,
        search_scope: scope.kind,
        page_searched: scope.page_searched(),
        line_searched: scope.lines,
        success: false,
        matched_variation: None,
        found_location: None,
        note: None,
    };

    for variation in VariationType::ALL {
        let Some(matcher) = build_matcher(&target.text, variation, strategy.use_pattern) else {
            continue;
        };

        for &page in &scope.pages {
            if let Some(found) = index.find(&matcher, variation, page, scope.lines) {
                attempt.success = true;
                attempt.matched_variation = Some(variation);
                attempt.found_location = Some(FoundLocation {
                    page,
                    lines: found.lines.clone(),
                });
                let hit = Hit {
                    page,
                    lines: found.lines,
                    span: found.span,
                    variation,
                    matcher,
                };
                return (attempt, Some(hit));
            }
        }
    }

    attempt.note = Some(format!("not found in {} page(s)", scope.pages.len()));
    (attempt, None)
}

fn build_matcher(text: &str, variation: VariationType, use_pattern: bool) -> Option<Matcher> {
    let needle = canonicalize(text, variation);
    if use_pattern {
        Matcher::pattern(needle)
    } else {
        Matcher::literal(needle)
    }
}

/// Look for the anchor inside the matched phrase.
///
/// Stricter variations than the phrase's own cannot hold the phrase on
/// these lines, so the search starts at the phrase's variation. At each
/// looser one the phrase is matched again to get its span there.
fn locate_anchor(claim: &Claim, phrase_hit: &Hit, index: &LayoutIndex<'_>) -> AnchorMatch {
    let Some(anchor) = claim.distinct_anchor() else {
        return AnchorMatch::NotRequested;
    };
    let phrase = claim.expected_phrase.trim();
    let lines = phrase_hit.line_range();
    let tolerant = phrase_hit.matcher.is_pattern();

    for variation in VariationType::ALL.into_iter().filter(|v| *v >= phrase_hit.variation) {
        let phrase_span = if variation == phrase_hit.variation {
            Some(phrase_hit.span.clone())
        } else {
            build_matcher(phrase, variation, tolerant)
                .and_then(|m| index.find(&m, variation, phrase_hit.page, lines))
                .map(|found| found.span)
        };
        let (Some(phrase_span), Some(matcher)) = (phrase_span, build_matcher(anchor, variation, false)) else {
            continue;
        };
        if let Some(found) = index.find_within(&matcher, variation, phrase_hit.page, phrase_span) {
            return AnchorMatch::Located(Hit {
                page: phrase_hit.page,
                lines: found.lines,
                span: found.span,
                variation,
                matcher,
            });
        }
    }

    AnchorMatch::Missed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Page, SourceLayout, TextItem};
    use crate::search::SearchMethod;

    fn page(lines: &[&str]) -> Page {
        Page::new(
            lines
                .iter()
                .enumerate()
                .map(|(i, text)| TextItem::new(*text, 50.0, 700.0 - 14.0 * i as f64, 300.0, 10.0))
                .collect(),
        )
    }

    fn resolve_in(claim: &Claim, layout: &SourceLayout) -> Resolution {
        let index = LayoutIndex::new(layout, 0.5);
        resolve(claim, &index, &SearchSettings::default())
    }

    #[test]
    fn test_exact_line_hit_is_single_attempt() {
        let layout = SourceLayout::new(vec![page(&["Intro", "Revenue grew 12% in 2023.", "Outro"])]);
        let claim = Claim::new("revenue grew 12% in 2023").on_page(1).on_lines([2]);
        let resolution = resolve_in(&claim, &layout);

        assert_eq!(resolution.attempts.len(), 1);
        let attempt = resolution.winning_attempt().unwrap();
        assert_eq!(attempt.method, SearchMethod::ExactLineMatch);
        assert_eq!(attempt.matched_variation, Some(VariationType::Exact));
        assert_eq!(attempt.found_location.as_ref().unwrap().lines, vec![2]);
    }

    #[test]
    fn test_falls_through_to_nearby_lines() {
        let layout = SourceLayout::new(vec![page(&["a", "b", "c", "target phrase here", "d"])]);
        let claim = Claim::new("target phrase here").on_page(1).on_lines([2]);
        let resolution = resolve_in(&claim, &layout);

        let methods: Vec<_> = resolution.attempts.iter().map(|a| a.method).collect();
        assert_eq!(methods, vec![SearchMethod::ExactLineMatch, SearchMethod::NearbyLines]);
        assert!(!resolution.attempts[0].success);
        assert!(resolution.attempts[0].note.is_some());
    }

    #[test]
    fn test_looser_variation_is_recorded() {
        let layout = SourceLayout::new(vec![page(&["The fee was 1000 USD in total."])]);
        let claim = Claim::new("fee was $1,000").on_page(1);
        let resolution = resolve_in(&claim, &layout);

        let attempt = resolution.winning_attempt().unwrap();
        assert_eq!(attempt.method, SearchMethod::CurrentPage);
        assert_eq!(attempt.matched_variation, Some(VariationType::Currency));
    }

    #[test]
    fn test_anchor_located_inside_phrase() {
        let layout = SourceLayout::new(vec![page(&["net revenue rose", "sharply this year"])]);
        let claim = Claim::new("net revenue rose sharply")
            .with_anchor("rose sharply")
            .on_page(1);
        let resolution = resolve_in(&claim, &layout);
        let winner = resolution.winner.unwrap();
        assert_eq!(winner.target, SearchTarget::Phrase);
        match winner.anchor {
            AnchorMatch::Located(hit) => assert_eq!(hit.lines, vec![1, 2]),
            other => panic!("expected located anchor, got {:?}", other),
        }
    }

    #[test]
    fn test_anchor_beside_phrase_on_same_line_is_missed() {
        let layout = SourceLayout::new(vec![page(&["Costs fell 5 percent while net revenue rose sharply."])]);
        let claim = Claim::new("net revenue rose sharply")
            .with_anchor("5 percent")
            .on_page(1);
        let resolution = resolve_in(&claim, &layout);
        let winner = resolution.winner.unwrap();
        assert_eq!(winner.target, SearchTarget::Phrase);
        assert!(matches!(winner.anchor, AnchorMatch::Missed));
    }

    #[test]
    fn test_anchor_missed_inside_phrase() {
        let layout = SourceLayout::new(vec![page(&["net revenue rose sharply"])]);
        let claim = Claim::new("net revenue rose sharply")
            .with_anchor("operating margin")
            .on_page(1);
        let resolution = resolve_in(&claim, &layout);
        assert!(matches!(resolution.winner.unwrap().anchor, AnchorMatch::Missed));
    }

    #[test]
    fn test_exhaustion_has_no_winner() {
        let layout = SourceLayout::new(vec![page(&["nothing relevant"])]);
        let claim = Claim::new("quantum flux capacitor").on_page(1);
        let resolution = resolve_in(&claim, &layout);
        assert!(resolution.winner.is_none());
        assert!(resolution.attempts.iter().all(|a| !a.success));
        assert!(resolution
            .attempts
            .windows(2)
            .all(|w| w[0].method <= w[1].method));
    }
}
