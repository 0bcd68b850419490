//! The claim under verification: what an AI response says it quoted.

use serde::{Deserialize, Serialize};

/// A quoted phrase and where the response says it came from
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    /// Full quoted text
    pub expected_phrase: String,

    /// Shorter excerpt inside the phrase, used for tighter highlighting
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor_text: Option<String>,

    /// Expected 1-based page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_page: Option<u32>,

    /// Expected 1-based line numbers on the expected page
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub expected_lines: Vec<u32>,

    /// Caller-supplied phrase tried late in the fallback chain
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_phrase: Option<String>,
}

impl Claim {
    pub fn new(expected_phrase: impl Into<String>) -> Self {
        Self {
            expected_phrase: expected_phrase.into(),
            ..Default::default()
        }
    }

    pub fn with_anchor(mut self, anchor: impl Into<String>) -> Self {
        self.anchor_text = Some(anchor.into());
        self
    }

    pub fn on_page(mut self, page: u32) -> Self {
        self.expected_page = Some(page);
        self
    }

    pub fn on_lines(mut self, lines: impl IntoIterator<Item = u32>) -> Self {
        self.expected_lines = lines.into_iter().collect();
        self
    }

    pub fn with_custom_phrase(mut self, phrase: impl Into<String>) -> Self {
        self.custom_phrase = Some(phrase.into());
        self
    }

    /// Anchor text when present and not blank
    pub fn anchor(&self) -> Option<&str> {
        self.anchor_text
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
    }

    /// Anchor text when it is not just the phrase again
    pub fn distinct_anchor(&self) -> Option<&str> {
        let phrase = self.expected_phrase.trim();
        self.anchor().filter(|a| !a.eq_ignore_ascii_case(phrase))
    }

    /// Inclusive range spanned by the expected lines
    pub fn expected_line_span(&self) -> Option<(u32, u32)> {
        let min = self.expected_lines.iter().copied().min()?;
        let max = self.expected_lines.iter().copied().max()?;
        Some((min, max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_anchor_is_ignored() {
        let claim = Claim::new("net revenue grew").with_anchor("   ");
        assert_eq!(claim.anchor(), None);

        let claim = Claim::new("net revenue grew").with_anchor(" revenue ");
        assert_eq!(claim.anchor(), Some("revenue"));
        assert_eq!(claim.distinct_anchor(), Some("revenue"));

        let claim = Claim::new("Net Revenue").with_anchor("net revenue");
        assert_eq!(claim.distinct_anchor(), None);
    }

    #[test]
    fn test_expected_line_span() {
        assert_eq!(Claim::new("x").expected_line_span(), None);
        let claim = Claim::new("x").on_lines([12, 9, 10]);
        assert_eq!(claim.expected_line_span(), Some((9, 12)));
    }

    #[test]
    fn test_deserialize_minimal_claim() {
        let claim: Claim = serde_json::from_str(r#"{"expected_phrase":"hello"}"#).unwrap();
        assert_eq!(claim.expected_phrase, "hello");
        assert!(claim.expected_lines.is_empty());
        assert!(claim.anchor_text.is_none());
    }
}
