//! Verification entry point.
//!
//! A verification is a synchronous computation over a borrowed claim and
//! layout. Independent claims can be verified in parallel by the caller.

use tracing::{info, instrument, warn};

use super::ambiguity;
use super::assembler::assemble;
use super::safety::SafetyViolation;
use crate::config::EngineConfig;
use crate::domain::{Claim, SourceLayout, TextItem, Verification, VerifiedLocation};
use crate::evidence::snippet::match_snippet;
use crate::search::{matched_words, resolve, AnchorMatch, Hit, LayoutIndex, Resolution, SearchAttempt};

/// Verifies claims with a fixed engine configuration
#[derive(Debug, Clone, Default)]
pub struct Verifier {
    config: EngineConfig,
}

impl Verifier {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Locate `claim` in `layout` and derive its verdict.
    ///
    /// Fails only when an input exceeds the configured size limits.
    #[instrument(skip_all, fields(expected_page = ?claim.expected_page))]
    pub fn verify(&self, claim: &Claim, layout: &SourceLayout) -> Result<Verification, SafetyViolation> {
        let limits = &self.config.safety;
        limits.validate_claim(claim).map_err(refused)?;

        if claim.expected_phrase.trim().is_empty() {
            return Ok(finish(Verification::not_found(vec![SearchAttempt::skipped(
                &claim.expected_phrase,
                "empty claim phrase",
            )])));
        }
        if layout.pages.is_empty() {
            return Ok(finish(Verification::not_found(vec![SearchAttempt::skipped(
                &claim.expected_phrase,
                "source layout has no pages",
            )])));
        }
        limits.validate_document(layout).map_err(refused)?;

        let index = LayoutIndex::new(layout, self.config.search.line_tolerance);
        let resolution = resolve(claim, &index, &self.config.search);
        let method = resolution.winning_attempt().map(|a| a.method);
        let status = assemble(claim, &resolution.attempts, resolution.winner.as_ref());

        let Resolution { attempts, winner } = resolution;
        let (Some(winner), Some(method)) = (winner, method) else {
            return Ok(finish(Verification::not_found(attempts)));
        };

        let hit = &winner.hit;
        let ambiguity = ambiguity::detect(hit, method, claim, &index, &self.config.ambiguity);
        let matched_deep_item = deep_item(&index, hit);
        let matched_text = index
            .matched_text(hit.page, &hit.lines, &hit.matcher, hit.variation)
            .or_else(|| matched_deep_item.as_ref().map(|item| item.text.clone()));
        let (anchor_matched_deep_item, anchor_matched_text) = match &winner.anchor {
            AnchorMatch::Located(anchor) => (
                deep_item(&index, anchor),
                anchor_text(&index, anchor, matched_text.as_deref()),
            ),
            AnchorMatch::NotRequested | AnchorMatch::Missed => (None, None),
        };
        let verified_match_snippet = matched_text.as_deref().map(|text| {
            let lines_text = index.lines_text(hit.page, &hit.lines);
            match_snippet(&lines_text, text, self.config.highlight.snippet_window)
        });

        Ok(finish(Verification {
            status,
            search_attempts: attempts,
            ambiguity,
            location: Some(VerifiedLocation {
                page: hit.page,
                lines: hit.lines.clone(),
            }),
            matched_deep_item,
            anchor_matched_deep_item,
            matched_text,
            anchor_matched_text,
            verified_match_snippet,
        }))
    }
}

/// Verify with the default engine configuration
pub fn verify(claim: &Claim, layout: &SourceLayout) -> Result<Verification, SafetyViolation> {
    Verifier::default().verify(claim, layout)
}

/// Merged item covering the text of a hit
fn deep_item(index: &LayoutIndex<'_>, hit: &Hit) -> Option<TextItem> {
    TextItem::merge(index.matched_items(hit.page, &hit.lines, &hit.matcher, hit.variation))
}

/// Source text of the anchor, looked up inside the phrase's matched text
fn anchor_text(index: &LayoutIndex<'_>, anchor: &Hit, phrase_text: Option<&str>) -> Option<String> {
    phrase_text
        .and_then(|text| matched_words(text, &anchor.matcher, anchor.variation))
        .or_else(|| index.matched_text(anchor.page, &anchor.lines, &anchor.matcher, anchor.variation))
}

fn refused(violation: SafetyViolation) -> SafetyViolation {
    warn!(%violation, "Refusing to verify claim");
    violation
}

fn finish(verification: Verification) -> Verification {
    info!(
        status = %verification.status,
        attempts = verification.search_attempts.len(),
        page = ?verification.verified_page(),
        ambiguous = verification.ambiguity.is_some(),
        "Verification complete"
    );
    verification
}
