//! Match snippets and deterministic claim keys.

use sha2::{Digest, Sha256};

use crate::domain::Claim;

/// Context around `matched` inside `text`, about `window` characters long.
///
/// When `matched` does not occur verbatim the snippet is taken from the
/// start of `text`. Truncated ends are marked with `...`.
pub fn match_snippet(text: &str, matched: &str, window: usize) -> String {
    let (start, end) = match text.find(matched).filter(|_| !matched.is_empty()) {
        Some(start) => (start, start + matched.len()),
        None => (0, 0),
    };

    let span_chars = text[start..end].chars().count();
    let each_side = window.saturating_sub(span_chars) / 2;

    // Walk back/forward by characters so boundaries stay valid UTF-8
    let anchor_start = text[..start]
        .char_indices()
        .rev()
        .nth(each_side.saturating_sub(1))
        .map_or(0, |(i, _)| i);
    let anchor_start = if each_side == 0 { start } else { anchor_start };

    let tail_budget = if start == end { window } else { each_side };
    let anchor_end = text[end..]
        .char_indices()
        .nth(tail_budget)
        .map_or(text.len(), |(i, _)| end + i);

    let prefix = if anchor_start > 0 { "..." } else { "" };
    let suffix = if anchor_end < text.len() { "..." } else { "" };

    format!("{}{}{}", prefix, &text[anchor_start..anchor_end], suffix)
}

/// Deterministic 16-character key for a claim
pub fn claim_key(claim: &Claim) -> String {
    let mut hasher = Sha256::new();
    hasher.update(claim.expected_phrase.as_bytes());
    hasher.update([0]);
    hasher.update(claim.anchor_text.as_deref().unwrap_or("").as_bytes());
    hasher.update([0]);
    if let Some(page) = claim.expected_page {
        hasher.update(page.to_string().as_bytes());
    }
    for line in &claim.expected_lines {
        hasher.update(b",");
        hasher.update(line.to_string().as_bytes());
    }

    let result = hasher.finalize();
    hex::encode(&result[..8])
}
