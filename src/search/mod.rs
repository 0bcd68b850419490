//! Cascading search over a source layout.
//!
//! - `method`: the ordered strategy taxonomy
//! - `attempt`: append-only attempt records
//! - `index`: canonical page text, built once per variation
//! - `strategy`: plans which strategies apply to a claim
//! - `resolver`: runs the plan until the first success

pub mod attempt;
pub mod index;
pub mod method;
pub mod resolver;
pub mod strategy;

pub use attempt::{FoundLocation, LineRange, SearchAttempt, SearchScope, SearchTarget};
pub use index::{matched_words, Found, LayoutIndex, Matcher};
pub use method::SearchMethod;
pub use resolver::{resolve, AnchorMatch, Hit, Resolution, Winner};
