//! Monetary and numeric canonicalization.
//!
//! Input is already lowercased and whitespace-collapsed.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

lazy_static! {
    static ref CURRENCY_SYMBOL: Regex = Regex::new(r"[$€£¥₹¢]").unwrap();

    static ref CODE_AFTER_AMOUNT: Regex =
        Regex::new(r"(\d) ?(?:usd|eur|gbp|jpy|cad|aud|chf|inr|dollars?|euros?|pounds?)\b").unwrap();

    static ref CODE_BEFORE_AMOUNT: Regex =
        Regex::new(r"\b(?:usd|eur|gbp|jpy|cad|aud|chf|inr|us) ?(\d)").unwrap();

    /// Comma-grouped amount: 1,000 or 12,345,678.90
    static ref COMMA_GROUPED: Regex = Regex::new(r"\d{1,3}(?:,\d{3})+(?:\.\d+)?").unwrap();

    static ref ZERO_CENTS: Regex = Regex::new(r"(\d)\.00\b").unwrap();

    /// European style: 1.000,50
    static ref EUROPEAN_DECIMAL: Regex = Regex::new(r"\b\d{1,3}(?:\.\d{3})+,\d+\b").unwrap();

    static ref TRAILING_DECIMAL_ZEROS: Regex = Regex::new(r"(\d)\.(\d*[1-9])0+\b").unwrap();

    static ref ALL_ZERO_DECIMALS: Regex = Regex::new(r"(\d)\.0+\b").unwrap();

    static ref PERCENT_WORD: Regex = Regex::new(r"(\d) ?(?:percent|per cent|pct)\b").unwrap();
}

/// Drop currency markers and thousands separators around amounts
pub(super) fn normalize_currency(text: &str) -> String {
    let s = CURRENCY_SYMBOL.replace_all(text, "");
    let s = CODE_AFTER_AMOUNT.replace_all(&s, "$1");
    let s = CODE_BEFORE_AMOUNT.replace_all(&s, "$1");
    let s = strip_grouping_commas(&s);
    ZERO_CENTS.replace_all(&s, "$1").into_owned()
}

/// Unify decimal style and percent spelling
pub(super) fn normalize_numeric(text: &str) -> String {
    let s = EUROPEAN_DECIMAL.replace_all(text, |caps: &Captures| {
        caps[0].replace('.', "").replace(',', ".")
    });
    let s = strip_grouping_commas(&s);
    let s = TRAILING_DECIMAL_ZEROS.replace_all(&s, "$1.$2");
    let s = ALL_ZERO_DECIMALS.replace_all(&s, "$1");
    PERCENT_WORD.replace_all(&s, "$1%").into_owned()
}

fn strip_grouping_commas(text: &str) -> String {
    COMMA_GROUPED
        .replace_all(text, |caps: &Captures| caps[0].replace(',', ""))
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_markers_removed() {
        assert_eq!(normalize_currency("$1,000"), "1000");
        assert_eq!(normalize_currency("1000 usd"), "1000");
        assert_eq!(normalize_currency("usd 1,250.00 total"), "1250 total");
        assert_eq!(normalize_currency("£12,345,678.90"), "12345678.90");
    }

    #[test]
    fn test_currency_leaves_words_alone() {
        assert_eq!(normalize_currency("used cars"), "used cars");
        assert_eq!(normalize_currency("in 2024, sales"), "in 2024, sales");
    }

    #[test]
    fn test_numeric_decimal_styles() {
        assert_eq!(normalize_numeric("1.000,50"), "1000.5");
        assert_eq!(normalize_numeric("2.50"), "2.5");
        assert_eq!(normalize_numeric("7.000"), "7");
        assert_eq!(normalize_numeric("40 percent"), "40%");
    }
}
