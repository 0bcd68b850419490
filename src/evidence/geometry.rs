//! Evidence geometry: document-space boxes to screen-space highlights.
//!
//! Source boxes use a bottom-up y-axis in document units; rendered page
//! images are top-down pixels. Every function here returns `None` when a
//! scale, dimension, zoom or container size is not finite and positive, or
//! when the box itself is not finite. Nothing in this module yields NaN.

use serde::{Deserialize, Serialize};

use crate::domain::{BoundingBox, TextItem};

/// Document units to image pixels, per axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderScale {
    pub x: f64,
    pub y: f64,
}

impl RenderScale {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn uniform(scale: f64) -> Self {
        Self { x: scale, y: scale }
    }
}

/// Rectangle in percent of the rendered image, each value in `[0, 100]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// [`PercentRect`] formatted for style attributes, e.g. `"20%"`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CssRect {
    pub left: String,
    pub top: String,
    pub width: String,
    pub height: String,
}

impl PercentRect {
    pub fn to_css(&self) -> CssRect {
        CssRect {
            left: format!("{}%", self.left),
            top: format!("{}%", self.top),
            width: format!("{}%", self.width),
            height: format!("{}%", self.height),
        }
    }
}

/// Scroll offsets that center a highlight in its container
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollTarget {
    pub scroll_left: f64,
    pub scroll_top: f64,
}

/// Highlight center in percent of the image, for animation origins
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OriginPercent {
    pub x_percent: f64,
    pub y_percent: f64,
}

impl AsRef<BoundingBox> for BoundingBox {
    fn as_ref(&self) -> &BoundingBox {
        self
    }
}

impl AsRef<BoundingBox> for TextItem {
    fn as_ref(&self) -> &BoundingBox {
        &self.bbox
    }
}

/// Clamped pixel edges of a box on the image
#[derive(Debug, Clone, Copy)]
struct PixelRect {
    left: f64,
    top: f64,
    right: f64,
    bottom: f64,
}

impl PixelRect {
    fn center(&self) -> (f64, f64) {
        ((self.left + self.right) / 2.0, (self.top + self.bottom) / 2.0)
    }
}

fn is_positive_finite(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// Flip and scale a document box onto the image, clamping each edge
/// independently to the image bounds
fn pixel_rect(
    bbox: &BoundingBox,
    scale: RenderScale,
    image_width: f64,
    image_height: f64,
) -> Option<PixelRect> {
    let valid = is_positive_finite(scale.x)
        && is_positive_finite(scale.y)
        && is_positive_finite(image_width)
        && is_positive_finite(image_height)
        && bbox.is_finite();
    if !valid {
        return None;
    }

    let raw_x = bbox.x * scale.x;
    let raw_y = image_height - bbox.y * scale.y;
    let raw_w = bbox.width * scale.x;
    let raw_h = bbox.height * scale.y;

    let left = raw_x.clamp(0.0, image_width);
    let top = raw_y.clamp(0.0, image_height);
    let right = (raw_x + raw_w).clamp(0.0, image_width).max(left);
    let bottom = (raw_y + raw_h).clamp(0.0, image_height).max(top);

    let rect = PixelRect {
        left,
        top,
        right,
        bottom,
    };
    let finite = [rect.left, rect.top, rect.right, rect.bottom]
        .iter()
        .all(|v| v.is_finite());
    finite.then_some(rect)
}

/// Highlight rectangle as percentages of the rendered image
pub fn to_percent_rect(
    item: &impl AsRef<BoundingBox>,
    scale: RenderScale,
    image_width: f64,
    image_height: f64,
) -> Option<PercentRect> {
    let px = pixel_rect(item.as_ref(), scale, image_width, image_height)?;
    Some(PercentRect {
        left: px.left / image_width * 100.0,
        top: px.top / image_height * 100.0,
        width: (px.right - px.left) / image_width * 100.0,
        height: (px.bottom - px.top) / image_height * 100.0,
    })
}

/// Scroll offsets that center the item in a container at `zoom`.
///
/// Each axis is clamped to `[0, max(0, image * zoom - container)]`.
pub fn compute_scroll_target(
    item: &impl AsRef<BoundingBox>,
    scale: RenderScale,
    image_width: f64,
    image_height: f64,
    zoom: f64,
    container_width: f64,
    container_height: f64,
) -> Option<ScrollTarget> {
    let valid = is_positive_finite(zoom)
        && is_positive_finite(container_width)
        && is_positive_finite(container_height);
    if !valid {
        return None;
    }

    let px = pixel_rect(item.as_ref(), scale, image_width, image_height)?;
    let (center_x, center_y) = px.center();

    let max_left = (image_width * zoom - container_width).max(0.0);
    let max_top = (image_height * zoom - container_height).max(0.0);
    let scroll_left = (center_x * zoom - container_width / 2.0).clamp(0.0, max_left);
    let scroll_top = (center_y * zoom - container_height / 2.0).clamp(0.0, max_top);

    if scroll_left.is_finite() && scroll_top.is_finite() {
        Some(ScrollTarget {
            scroll_left,
            scroll_top,
        })
    } else {
        None
    }
}

/// Center of the item as a percentage of the image
pub fn compute_origin_percent(
    item: &impl AsRef<BoundingBox>,
    scale: RenderScale,
    image_width: f64,
    image_height: f64,
) -> Option<OriginPercent> {
    let px = pixel_rect(item.as_ref(), scale, image_width, image_height)?;
    let (center_x, center_y) = px.center();
    Some(OriginPercent {
        x_percent: (center_x / image_width * 100.0).clamp(0.0, 100.0),
        y_percent: (center_y / image_height * 100.0).clamp(0.0, 100.0),
    })
}
