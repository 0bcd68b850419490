//! Evidence for a verified claim: where to draw it and what to show.
//!
//! - `geometry`: document boxes to image percentages, scroll and origin
//! - `highlight`: word counting and the anchor sub-highlight policy
//! - `snippet`: match context and claim keys

pub mod geometry;
pub mod highlight;
pub mod snippet;

pub use geometry::{
    compute_origin_percent, compute_scroll_target, to_percent_rect, CssRect, OriginPercent,
    PercentRect, RenderScale, ScrollTarget,
};
pub use highlight::{should_highlight_anchor, word_count, word_count_with_limits};
pub use snippet::{claim_key, match_snippet};
