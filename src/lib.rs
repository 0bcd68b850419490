//! citeproof - Citation location and verification engine
//!
//! Given a claim quoted by an AI response and the extracted layout of the
//! source document, citeproof finds where the claim actually appears,
//! records every search attempt on the way, and derives a single verdict
//! with the evidence needed to highlight the match.
//!
//! # Architecture
//!
//! Verification is a pure, synchronous computation per claim:
//! - Strategies run in a fixed priority order and stop at the first hit
//! - Each strategy tries progressively looser text canonicalizations
//! - The attempt trail is append-only and fully returned to the caller
//! - Status is derived from the trail, never asserted by a strategy
//!
//! # Modules
//!
//! - `domain`: Data structures (Claim, SourceLayout, Verification)
//! - `normalize`: Text canonicalization per variation level
//! - `search`: Strategy plan, canonical index and cascade resolver
//! - `core`: Safety limits, ambiguity, status assembly, verifier
//! - `evidence`: Highlight geometry, word counts, snippets
//! - `config`: Engine configuration
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Verify claims against an extracted layout
//! citeproof verify --layout layout.json --claims claims.json --pretty
//!
//! # Highlight geometry for one box
//! citeproof rect --x 200 --y 1000 --width 300 --height 20 \
//!     --scale-x 2 --scale-y 2 --image-width 2000 --image-height 2800
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod evidence;
pub mod normalize;
pub mod search;

// Re-export main types at crate root for convenience
pub use config::EngineConfig;
pub use core::{verify, AmbiguityInfo, Confidence, SafetyLimits, SafetyViolation, Verifier};
pub use domain::{BoundingBox, Claim, Page, SearchStatus, SourceLayout, TextItem, Verification};
pub use normalize::VariationType;
pub use search::{SearchAttempt, SearchMethod, SearchScope};
