//! Core verification logic.
//!
//! This module contains:
//! - Safety: input-size limits and enforcement
//! - Ambiguity: repeated-match detection
//! - Assembler: status derivation from the attempt trail
//! - Verifier: the verification entry point

pub mod ambiguity;
pub mod assembler;
pub mod safety;
pub mod verifier;

pub use ambiguity::{AmbiguityInfo, Confidence};
pub use assembler::assemble;
pub use safety::{LimitedInput, SafetyLimits, SafetyViolation};
pub use verifier::{verify, Verifier};
