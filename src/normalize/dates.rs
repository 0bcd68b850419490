//! Calendar date canonicalization.
//!
//! Recognized forms are rewritten to `yyyy-mm-dd`. Slash dates are read as
//! month/day/year unless the first field cannot be a month.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

const MONTHS: &str = "january|february|march|april|may|june|july|august|september|october|november|december|jan|feb|mar|apr|jun|jul|aug|sept|sep|oct|nov|dec";

lazy_static! {
    static ref ISO_DATE: Regex = Regex::new(r"\b(\d{4})-(\d{1,2})-(\d{1,2})\b").unwrap();

    static ref SLASH_DATE: Regex = Regex::new(r"\b(\d{1,2})[/.-](\d{1,2})[/.-](\d{4})\b").unwrap();

    static ref MONTH_FIRST: Regex = Regex::new(&format!(
        r"\b({})\.? (\d{{1,2}})(?:st|nd|rd|th)?,? (\d{{4}})\b",
        MONTHS
    ))
    .unwrap();

    static ref DAY_FIRST: Regex = Regex::new(&format!(
        r"\b(\d{{1,2}})(?:st|nd|rd|th)? (?:of )?({})\.?,? (\d{{4}})\b",
        MONTHS
    ))
    .unwrap();
}

pub(super) fn normalize_dates(text: &str) -> String {
    let s = MONTH_FIRST.replace_all(text, |caps: &Captures| {
        rewrite(&caps[0], &caps[3], month_number(&caps[1]), &caps[2])
    });
    let s = DAY_FIRST.replace_all(&s, |caps: &Captures| {
        rewrite(&caps[0], &caps[3], month_number(&caps[2]), &caps[1])
    });
    let s = SLASH_DATE.replace_all(&s, |caps: &Captures| {
        let first: u32 = caps[1].parse().unwrap_or(0);
        let (month, day) = if first > 12 {
            (&caps[2], &caps[1])
        } else {
            (&caps[1], &caps[2])
        };
        rewrite(&caps[0], &caps[3], month.parse().ok(), day)
    });
    ISO_DATE
        .replace_all(&s, |caps: &Captures| {
            rewrite(&caps[0], &caps[1], caps[2].parse().ok(), &caps[3])
        })
        .into_owned()
}

/// Format as ISO, or keep the original text when the fields are not a date
fn rewrite(original: &str, year: &str, month: Option<u32>, day: &str) -> String {
    let day: Option<u32> = day.parse().ok();
    match (month, day) {
        (Some(m @ 1..=12), Some(d @ 1..=31)) => format!("{}-{:02}-{:02}", year, m, d),
        _ => original.to_string(),
    }
}

fn month_number(name: &str) -> Option<u32> {
    let month = match name.get(..3)? {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}
