//! Canonical text index over a borrowed source layout.
//!
//! Each page is canonicalized line by line, at most once per variation per
//! verification call, and shared by every strategy and by the ambiguity
//! scan. Line offsets into the canonical page text are kept so a match can
//! be mapped back to line numbers and text items.
//!
//! Only the `exact` level keeps word separators, so only there are matches
//! held to word boundaries. At looser levels a needle may match inside a
//! longer word (`rose` inside `prose`).

use std::cell::OnceCell;
use std::ops::Range;

use regex::{Regex, RegexBuilder};

use super::attempt::LineRange;
use crate::domain::{Line, SourceLayout, TextItem};
use crate::normalize::{canonicalize, VariationType};

/// Compiled-size bound for document scan patterns
const PATTERN_SIZE_LIMIT: usize = 1 << 20;

/// A canonical needle, optionally compiled to a regex for document scans
#[derive(Debug, Clone)]
pub struct Matcher {
    needle: String,
    pattern: Option<Regex>,
}

impl Matcher {
    /// Substring matcher; `None` when the needle is empty
    pub fn literal(needle: String) -> Option<Self> {
        if needle.is_empty() {
            return None;
        }
        Some(Self {
            needle,
            pattern: None,
        })
    }

    /// Regex matcher that also tolerates missing or extra spaces between
    /// words. Falls back to a literal when the pattern cannot be compiled
    /// within the size bound.
    pub fn pattern(needle: String) -> Option<Self> {
        if needle.is_empty() {
            return None;
        }
        let source = needle
            .split(' ')
            .filter(|w| !w.is_empty())
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join(r"\s*");
        let pattern = RegexBuilder::new(&source)
            .size_limit(PATTERN_SIZE_LIMIT)
            .build()
            .ok();
        Some(Self { needle, pattern })
    }

    pub fn needle(&self) -> &str {
        &self.needle
    }

    pub fn is_pattern(&self) -> bool {
        self.pattern.is_some()
    }

    /// Byte range of the first occurrence
    pub fn find(&self, haystack: &str, whole_words: bool) -> Option<Range<usize>> {
        self.find_in(haystack, 0..haystack.len(), whole_words)
    }

    /// Byte range of the first occurrence inside `window`.
    ///
    /// Word boundaries are judged against the whole haystack, so a match
    /// at the window edge still needs a separator outside it.
    pub fn find_in(&self, haystack: &str, window: Range<usize>, whole_words: bool) -> Option<Range<usize>> {
        let base = window.start;
        let slice = haystack.get(window)?;
        self.occurrences(slice)
            .map(|m| m.start + base..m.end + base)
            .find(|m| !whole_words || on_word_boundaries(haystack, m))
    }

    /// Number of non-overlapping occurrences
    pub fn count(&self, haystack: &str, whole_words: bool) -> usize {
        self.occurrences(haystack)
            .filter(|m| !whole_words || on_word_boundaries(haystack, m))
            .count()
    }

    fn occurrences<'h>(&'h self, haystack: &'h str) -> Box<dyn Iterator<Item = Range<usize>> + 'h> {
        match &self.pattern {
            Some(re) => Box::new(re.find_iter(haystack).map(|m| m.range())),
            None => Box::new(
                haystack
                    .match_indices(self.needle.as_str())
                    .map(|(start, m)| start..start + m.len()),
            ),
        }
    }
}

/// A match edge that is a word character must not continue a word
fn on_word_boundaries(haystack: &str, m: &Range<usize>) -> bool {
    let matched = &haystack[m.clone()];
    let before = haystack[..m.start].chars().next_back();
    let after = haystack[m.end..].chars().next();
    let opens = matched.chars().next().is_some_and(char::is_alphanumeric);
    let closes = matched.chars().next_back().is_some_and(char::is_alphanumeric);

    !(opens && before.is_some_and(char::is_alphanumeric)) && !(closes && after.is_some_and(char::is_alphanumeric))
}

/// A match in the canonical text of one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Found {
    /// Lines the match touches, ascending
    pub lines: Vec<u32>,
    /// Byte range in the page's canonical text at the matching variation
    pub span: Range<usize>,
}

#[derive(Debug)]
struct CanonicalLine {
    number: u32,
    start: usize,
    end: usize,
}

#[derive(Debug)]
struct CanonicalPage {
    text: String,
    lines: Vec<CanonicalLine>,
}

impl CanonicalPage {
    fn build(page_text: impl Iterator<Item = (u32, String)>, variation: VariationType) -> Self {
        let separator = variation.separator();
        let mut text = String::new();
        let mut lines: Vec<CanonicalLine> = Vec::new();

        for (number, raw) in page_text {
            let canonical = canonicalize(&raw, variation);
            if variation != VariationType::Exact && join_line_break_hyphen(&mut text, &canonical) {
                for line in lines.iter_mut().rev() {
                    if line.end <= text.len() {
                        break;
                    }
                    line.end = text.len();
                    line.start = line.start.min(text.len());
                }
            }
            if !text.is_empty() && !canonical.is_empty() {
                text.push_str(separator);
            }
            let start = text.len();
            text.push_str(&canonical);
            lines.push(CanonicalLine {
                number,
                start,
                end: text.len(),
            });
        }

        Self { text, lines }
    }

    fn locate(&self, matcher: &Matcher, window: Range<usize>, whole_words: bool) -> Option<Found> {
        let span = matcher.find_in(&self.text, window, whole_words)?;
        let lines: Vec<u32> = self
            .lines
            .iter()
            .filter(|l| l.start < l.end && l.start < span.end && span.start < l.end)
            .map(|l| l.number)
            .collect();

        if lines.is_empty() {
            None
        } else {
            Some(Found { lines, span })
        }
    }
}

/// Drop a hyphen that ends a line inside a word, so `extra-` followed by
/// `ordinary` reads as one word. Returns whether the hyphen was dropped.
fn join_line_break_hyphen(text: &mut String, next_line: &str) -> bool {
    let mut tail = text.chars().rev();
    let (Some(hyphen), Some(before)) = (tail.next(), tail.next()) else {
        return false;
    };
    let continues = next_line.chars().next().is_some_and(char::is_alphabetic);
    if matches!(hyphen, '-' | '\u{00AD}') && before.is_alphabetic() && continues {
        text.pop();
        true
    } else {
        false
    }
}

/// Shortest run of whitespace-separated words in `text` whose canonical
/// form contains the match, as written in `text`
pub fn matched_words(text: &str, matcher: &Matcher, variation: VariationType) -> Option<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    let (start, end) = shortest_window(words.len(), |from, to| {
        let joined = words[from..=to].join(" ");
        matcher
            .find(&canonicalize(&joined, variation), variation.keeps_whitespace())
            .is_some()
    })?;
    Some(words[start..=end].join(" "))
}

/// Smallest `from..=to` window, ending as early as possible, for which
/// `matches` holds
fn shortest_window(len: usize, matches: impl Fn(usize, usize) -> bool) -> Option<(usize, usize)> {
    let end = (0..len).find(|&to| matches(0, to))?;
    let start = (0..=end).rev().find(|&from| matches(from, end)).unwrap_or(0);
    Some((start, end))
}

/// Line structure and lazily built canonical forms of a layout
#[derive(Debug)]
pub struct LayoutIndex<'a> {
    layout: &'a SourceLayout,
    lines: Vec<Vec<Line>>,
    canonical: [OnceCell<Vec<CanonicalPage>>; 7],
}

impl<'a> LayoutIndex<'a> {
    pub fn new(layout: &'a SourceLayout, line_tolerance: f64) -> Self {
        let lines = layout
            .pages
            .iter()
            .map(|page| page.lines(line_tolerance))
            .collect();
        Self {
            layout,
            lines,
            canonical: Default::default(),
        }
    }

    pub fn layout(&self) -> &'a SourceLayout {
        self.layout
    }

    pub fn page_count(&self) -> u32 {
        self.layout.page_count()
    }

    /// Number of derived lines on a 1-based page
    pub fn line_count(&self, page: u32) -> u32 {
        page_index(page)
            .and_then(|i| self.lines.get(i))
            .map_or(0, |lines| lines.len() as u32)
    }

    fn canonical(&self, variation: VariationType) -> &[CanonicalPage] {
        self.canonical[variation.index()].get_or_init(|| {
            self.layout
                .pages
                .iter()
                .zip(&self.lines)
                .map(|(page, lines)| {
                    let texts = lines.iter().map(|line| (line.number, page.line_text(line)));
                    CanonicalPage::build(texts, variation)
                })
                .collect()
        })
    }

    /// Search one page, optionally restricted to a line range
    pub fn find(
        &self,
        matcher: &Matcher,
        variation: VariationType,
        page: u32,
        lines: Option<LineRange>,
    ) -> Option<Found> {
        let canonical = self.canonical(variation).get(page_index(page)?)?;

        let window = match lines {
            Some(range) => {
                let mut selected = canonical.lines.iter().filter(|l| range.contains(l.number));
                let first = selected.next()?;
                let last = selected.last().unwrap_or(first);
                first.start..last.end
            }
            None => 0..canonical.text.len(),
        };

        canonical.locate(matcher, window, variation.keeps_whitespace())
    }

    /// Search inside an earlier match on the same page at the same variation
    pub fn find_within(
        &self,
        matcher: &Matcher,
        variation: VariationType,
        page: u32,
        span: Range<usize>,
    ) -> Option<Found> {
        let canonical = self.canonical(variation).get(page_index(page)?)?;
        canonical.locate(matcher, span, variation.keeps_whitespace())
    }

    /// Occurrences on one page, or across the document when `page` is `None`
    pub fn count(&self, matcher: &Matcher, variation: VariationType, page: Option<u32>) -> usize {
        let pages = self.canonical(variation);
        let whole_words = variation.keeps_whitespace();
        match page {
            Some(page) => page_index(page)
                .and_then(|i| pages.get(i))
                .map_or(0, |p| matcher.count(&p.text, whole_words)),
            None => pages.iter().map(|p| matcher.count(&p.text, whole_words)).sum(),
        }
    }

    /// Items of the given lines, in reading order
    fn line_items(&self, page: u32, lines: &[u32]) -> Vec<&'a TextItem> {
        let Some(index) = page_index(page) else {
            return Vec::new();
        };
        let (Some(source), Some(derived)) = (self.layout.pages.get(index), self.lines.get(index)) else {
            return Vec::new();
        };
        derived
            .iter()
            .filter(|line| lines.contains(&line.number))
            .flat_map(|line| line.items.iter().filter_map(|&i| source.items.get(i)))
            .collect()
    }

    /// The smallest contiguous run of items on `lines` whose canonical text
    /// contains the match. Falls back to every item on those lines when the
    /// match cannot be pinned to a run.
    pub fn matched_items(
        &self,
        page: u32,
        lines: &[u32],
        matcher: &Matcher,
        variation: VariationType,
    ) -> Vec<&'a TextItem> {
        let items = self.line_items(page, lines);
        let window = shortest_window(items.len(), |from, to| {
            matched_words(&joined_text(&items[from..=to]), matcher, variation).is_some()
        });

        match window {
            Some((start, end)) => items[start..=end].to_vec(),
            None => items,
        }
    }

    /// Source text of a match on `lines`, narrowed to the words it covers
    pub fn matched_text(
        &self,
        page: u32,
        lines: &[u32],
        matcher: &Matcher,
        variation: VariationType,
    ) -> Option<String> {
        let items = self.matched_items(page, lines, matcher, variation);
        matched_words(&joined_text(&items), matcher, variation)
    }

    /// Raw text of the given lines joined by spaces
    pub fn lines_text(&self, page: u32, lines: &[u32]) -> String {
        let Some(index) = page_index(page) else {
            return String::new();
        };
        let (Some(source), Some(derived)) = (self.layout.pages.get(index), self.lines.get(index)) else {
            return String::new();
        };
        derived
            .iter()
            .filter(|line| lines.contains(&line.number))
            .map(|line| source.line_text(line))
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn joined_text(items: &[&TextItem]) -> String {
    items
        .iter()
        .map(|item| item.text.trim())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn page_index(page: u32) -> Option<usize> {
    (page as usize).checked_sub(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Page;

    fn layout() -> SourceLayout {
        SourceLayout::new(vec![Page::new(vec![
            TextItem::new("Revenue for", 10.0, 700.0, 60.0, 10.0),
            TextItem::new("the year was", 72.0, 700.0, 60.0, 10.0),
            TextItem::new("$1,000 million.", 10.0, 686.0, 80.0, 10.0),
            TextItem::new("Costs were flat.", 10.0, 672.0, 80.0, 10.0),
        ])])
    }

    fn lines_layout(lines: &[&str]) -> SourceLayout {
        SourceLayout::new(vec![Page::new(
            lines
                .iter()
                .enumerate()
                .map(|(i, text)| TextItem::new(*text, 10.0, 700.0 - 14.0 * i as f64, 200.0, 10.0))
                .collect(),
        )])
    }

    fn exact(needle: &str) -> Matcher {
        Matcher::literal(canonicalize(needle, VariationType::Exact)).unwrap()
    }

    #[test]
    fn test_find_maps_match_to_lines() {
        let layout = layout();
        let index = LayoutIndex::new(&layout, 0.5);
        assert_eq!(index.line_count(1), 3);

        let found = index.find(&exact("year was $1,000"), VariationType::Exact, 1, None).unwrap();
        assert_eq!(found.lines, vec![1, 2]);
        assert_eq!(found.span, 16..31);

        let found = index.find(&exact("costs were flat"), VariationType::Exact, 1, None);
        assert_eq!(found.map(|f| f.lines), Some(vec![3]));
    }

    #[test]
    fn test_find_respects_line_range() {
        let layout = layout();
        let index = LayoutIndex::new(&layout, 0.5);
        let matcher = exact("costs were flat");
        assert!(index
            .find(&matcher, VariationType::Exact, 1, Some(LineRange::new(1, 2)))
            .is_none());
        assert!(index
            .find(&matcher, VariationType::Exact, 1, Some(LineRange::new(3, 3)))
            .is_some());
        assert!(index
            .find(&matcher, VariationType::Exact, 1, Some(LineRange::new(9, 12)))
            .is_none());
    }

    #[test]
    fn test_find_within_stays_inside_span() {
        let layout = lines_layout(&["Costs fell 5 percent while net revenue rose sharply."]);
        let index = LayoutIndex::new(&layout, 0.5);
        let phrase = index
            .find(&exact("net revenue rose sharply"), VariationType::Exact, 1, None)
            .unwrap();

        assert!(index
            .find_within(&exact("5 percent"), VariationType::Exact, 1, phrase.span.clone())
            .is_none());
        let inner = index
            .find_within(&exact("rose"), VariationType::Exact, 1, phrase.span.clone())
            .unwrap();
        assert!(phrase.span.start <= inner.span.start && inner.span.end <= phrase.span.end);
    }

    #[test]
    fn test_matched_items_narrow_to_run() {
        let layout = layout();
        let index = LayoutIndex::new(&layout, 0.5);
        let items = index.matched_items(1, &[1, 2], &exact("the year was $1,000"), VariationType::Exact);
        let texts: Vec<&str> = items.iter().map(|i| i.text.as_str()).collect();
        assert_eq!(texts, vec!["the year was", "$1,000 million."]);
    }

    #[test]
    fn test_matched_text_narrows_to_words() {
        let layout = lines_layout(&["Operating margin improved to 18 percent in the quarter"]);
        let index = LayoutIndex::new(&layout, 0.5);
        let text = index.matched_text(1, &[1], &exact("margin improved to 18 percent"), VariationType::Exact);
        assert_eq!(text.as_deref(), Some("margin improved to 18 percent"));

        let normalized = Matcher::literal(canonicalize("18 percent", VariationType::Normalized)).unwrap();
        let text = index.matched_text(1, &[1], &normalized, VariationType::Normalized);
        assert_eq!(text.as_deref(), Some("18 percent"));
    }

    #[test]
    fn test_line_break_hyphen_joins_at_normalized() {
        let layout = lines_layout(&["an extra-", "ordinary result"]);
        let index = LayoutIndex::new(&layout, 0.5);
        let needle = |v| Matcher::literal(canonicalize("extraordinary result", v)).unwrap();

        assert!(index.find(&needle(VariationType::Exact), VariationType::Exact, 1, None).is_none());
        let found = index
            .find(&needle(VariationType::Normalized), VariationType::Normalized, 1, None)
            .unwrap();
        assert_eq!(found.lines, vec![1, 2]);
    }

    #[test]
    fn test_exact_level_respects_word_boundaries() {
        let layout = lines_layout(&["Prose rose", "The rose, the prose."]);
        let index = LayoutIndex::new(&layout, 0.5);
        assert_eq!(index.count(&exact("rose"), VariationType::Exact, None), 2);

        let normalized = Matcher::literal(canonicalize("rose", VariationType::Normalized)).unwrap();
        assert_eq!(index.count(&normalized, VariationType::Normalized, None), 4);
    }

    #[test]
    fn test_pattern_tolerates_missing_spaces() {
        let matcher = Matcher::pattern("net revenue".to_string()).unwrap();
        assert_eq!(matcher.find("total netrevenue grew", true), Some(6..16));
        assert_eq!(matcher.count("net revenue and net  revenue", true), 2);
        assert_eq!(matcher.count("subnet revenue", true), 0);
        assert!(Matcher::pattern(String::new()).is_none());
    }

    #[test]
    fn test_count_by_page_and_document() {
        let layout = SourceLayout::new(vec![
            Page::new(vec![TextItem::new("alpha beta alpha", 0.0, 10.0, 10.0, 5.0)]),
            Page::new(vec![TextItem::new("alpha", 0.0, 10.0, 10.0, 5.0)]),
        ]);
        let index = LayoutIndex::new(&layout, 0.5);
        let matcher = exact("alpha");
        assert_eq!(index.count(&matcher, VariationType::Exact, None), 3);
        assert_eq!(index.count(&matcher, VariationType::Exact, Some(1)), 2);
        assert_eq!(index.count(&matcher, VariationType::Exact, Some(5)), 0);
    }
}
