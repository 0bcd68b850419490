//! Safety Limits Integration Tests
//!
//! Tests for input-size enforcement across verification and word counting.

use citeproof::core::{LimitedInput, SafetyLimits, SafetyViolation, Verifier};
use citeproof::evidence::{should_highlight_anchor, word_count, word_count_with_limits};
use citeproof::{Claim, EngineConfig, Page, SearchStatus, SourceLayout, TextItem};

fn layout(text: &str) -> SourceLayout {
    SourceLayout::new(vec![Page::new(vec![TextItem::new(text, 0.0, 100.0, 100.0, 10.0)])])
}

fn verifier(limits: SafetyLimits) -> Verifier {
    Verifier::new(EngineConfig {
        safety: limits,
        ..Default::default()
    })
}

#[test]
fn test_max_phrase_bytes() {
    let verifier = verifier(SafetyLimits {
        max_phrase_bytes: 100,
        ..Default::default()
    });
    let source = layout("x");

    // Phrase within limits
    assert!(verifier.verify(&Claim::new("x".repeat(50)), &source).is_ok());

    // Phrase at exact limit
    assert!(verifier.verify(&Claim::new("x".repeat(100)), &source).is_ok());

    // Phrase exceeding limit
    let result = verifier.verify(&Claim::new("x".repeat(200)), &source);
    match result {
        Err(SafetyViolation::InputTooLarge { input, actual, limit }) => {
            assert_eq!(input, LimitedInput::Phrase);
            assert_eq!(actual, 200);
            assert_eq!(limit, 100);
        }
        other => panic!("Expected InputTooLarge violation, got {:?}", other),
    }
}

#[test]
fn test_anchor_counts_toward_phrase_limit() {
    let verifier = verifier(SafetyLimits {
        max_phrase_bytes: 100,
        ..Default::default()
    });
    let claim = Claim::new("y".repeat(60)).with_anchor("z".repeat(60));
    assert!(verifier.verify(&claim, &layout("y")).is_err());
}

#[test]
fn test_max_document_bytes() {
    let verifier = verifier(SafetyLimits {
        max_document_bytes: 100,
        ..Default::default()
    });

    // Document within limits
    assert!(verifier.verify(&Claim::new("abc"), &layout(&"a".repeat(50))).is_ok());

    // Document exceeding limit is refused, not reported as not found
    let result = verifier.verify(&Claim::new("abc"), &layout(&"a".repeat(200)));
    match result {
        Err(SafetyViolation::InputTooLarge { input, actual, limit }) => {
            assert_eq!(input, LimitedInput::Document);
            assert_eq!(actual, 200);
            assert_eq!(limit, 100);
        }
        other => panic!("Expected InputTooLarge violation, got {:?}", other),
    }
}

#[test]
fn test_refusal_is_distinct_from_not_found() {
    let verifier = verifier(SafetyLimits::default());
    let verification = verifier.verify(&Claim::new("missing"), &layout("present")).unwrap();
    assert_eq!(verification.status, SearchStatus::NotFound);
}

#[test]
fn test_word_count_ceiling() {
    let limits = SafetyLimits {
        max_word_count_bytes: 100,
        ..Default::default()
    };

    assert_eq!(word_count_with_limits(&"ab ".repeat(33), &limits).unwrap(), 33);

    let result = word_count_with_limits(&"ab ".repeat(40), &limits);
    match result {
        Err(SafetyViolation::InputTooLarge { input, actual, limit }) => {
            assert_eq!(input, LimitedInput::WordCount);
            assert_eq!(actual, 120);
            assert_eq!(limit, 100);
        }
        other => panic!("Expected InputTooLarge violation, got {:?}", other),
    }
}

#[test]
fn test_default_word_count_ceiling() {
    let huge = "a ".repeat(SafetyLimits::default().max_word_count_bytes);
    assert!(word_count(&huge).is_err());
}

#[test]
fn test_highlight_policy_respects_ceiling() {
    let limits = SafetyLimits {
        max_word_count_bytes: 10,
        ..Default::default()
    };
    let result = should_highlight_anchor("a phrase that is too long", "phrase", 2, &limits);
    assert!(result.is_err());
}
