//! Text canonicalization under named variation classes.
//!
//! Every comparison in the search chain goes through [`canonicalize`]. The
//! variation levels are cumulative: a level applies all transforms of the
//! stricter levels before its own, so a looser level never rejects text a
//! stricter level accepts.
//!
//! | Level | Adds |
//! |-------|------|
//! | `exact` | lowercase, whitespace runs collapsed |
//! | `normalized` | NFKC, zero-width removal, line-break hyphen joins, whitespace removed |
//! | `currency` | currency symbols/codes dropped, `1,000` -> `1000`, `.00` dropped |
//! | `date` | calendar dates rewritten as `yyyy-mm-dd` |
//! | `numeric` | European decimals, trailing decimal zeros, `percent` -> `%` |
//! | `symbol` | dash/quote variants unified, remaining punctuation dropped |
//! | `accent` | diacritics folded |

mod dates;
mod numbers;

use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Tolerance class that allowed a match, strictest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariationType {
    Exact,
    Normalized,
    Currency,
    Date,
    Numeric,
    Symbol,
    Accent,
}

impl VariationType {
    /// All variations from strictest to most permissive
    pub const ALL: [VariationType; 7] = [
        VariationType::Exact,
        VariationType::Normalized,
        VariationType::Currency,
        VariationType::Date,
        VariationType::Numeric,
        VariationType::Symbol,
        VariationType::Accent,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VariationType::Exact => "exact",
            VariationType::Normalized => "normalized",
            VariationType::Currency => "currency",
            VariationType::Date => "date",
            VariationType::Numeric => "numeric",
            VariationType::Symbol => "symbol",
            VariationType::Accent => "accent",
        }
    }

    /// Position in [`VariationType::ALL`]
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Whether canonical text at this level keeps word separators
    pub fn keeps_whitespace(&self) -> bool {
        matches!(self, VariationType::Exact)
    }

    /// Separator placed between independently canonicalized lines
    pub fn separator(&self) -> &'static str {
        if self.keeps_whitespace() {
            " "
        } else {
            ""
        }
    }
}

impl fmt::Display for VariationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

lazy_static! {
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();

    /// A hyphen left at a line break inside a word: `exam- ple`
    static ref BROKEN_HYPHEN: Regex = Regex::new(r"(\p{L})[-\u{00AD}] (\p{L})").unwrap();

    static ref DASHES: Regex = Regex::new(r"[\u{2010}-\u{2015}\u{2212}\u{FE58}\u{FE63}\u{FF0D}]").unwrap();

    static ref SINGLE_QUOTES: Regex = Regex::new(r"[\u{2018}\u{2019}\u{201A}\u{201B}\u{2032}`´]").unwrap();

    static ref DOUBLE_QUOTES: Regex = Regex::new(r"[\u{201C}\u{201D}\u{201E}\u{201F}\u{2033}«»]").unwrap();
}

/// Canonical form of `text` under `variation`
pub fn canonicalize(text: &str, variation: VariationType) -> String {
    if variation == VariationType::Exact {
        return collapse_whitespace(&text.to_lowercase());
    }

    let folded: String = text
        .nfkc()
        .filter(|c| !is_zero_width(*c))
        .collect::<String>()
        .to_lowercase();
    let mut s = collapse_whitespace(&folded);
    s = BROKEN_HYPHEN.replace_all(&s, "$1$2").into_owned();

    if variation >= VariationType::Currency {
        s = numbers::normalize_currency(&s);
    }
    if variation >= VariationType::Date {
        s = dates::normalize_dates(&s);
    }
    if variation >= VariationType::Numeric {
        s = numbers::normalize_numeric(&s);
    }
    if variation >= VariationType::Symbol {
        s = normalize_symbols(&s);
    }
    if variation >= VariationType::Accent {
        s = fold_accents(&s);
    }

    s.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Collapse whitespace runs to single spaces and trim
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RUN.replace_all(text.trim(), " ").into_owned()
}

fn is_zero_width(c: char) -> bool {
    matches!(c, '\u{200B}' | '\u{200C}' | '\u{200D}' | '\u{2060}' | '\u{FEFF}')
}

fn normalize_symbols(text: &str) -> String {
    let s = DASHES.replace_all(text, "-");
    let s = SINGLE_QUOTES.replace_all(&s, "'");
    let s = DOUBLE_QUOTES.replace_all(&s, "\"");
    s.chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect()
}

fn fold_accents(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.nfd() {
        if is_combining_mark(c) {
            continue;
        }
        match c {
            'ß' => out.push_str("ss"),
            'æ' => out.push_str("ae"),
            'œ' => out.push_str("oe"),
            'ø' => out.push('o'),
            'ł' => out.push('l'),
            'đ' => out.push('d'),
            _ => out.push(c),
        }
    }
    out
}
