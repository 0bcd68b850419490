//! Domain types for citation verification.
//!
//! - Claim: what a response says it quoted, and where
//! - Layout: pages of positioned text items, with derived lines
//! - Verification: the verdict and its evidence

pub mod claim;
pub mod layout;
pub mod verification;

pub use claim::Claim;
pub use layout::{BoundingBox, Line, Page, SourceLayout, TextItem};
pub use verification::{SearchStatus, Verification, VerifiedLocation};
