//! Source layout: pages of positioned text items.
//!
//! Coordinates are in document units with a bottom-up y-axis (y grows
//! upward), as produced by the text-extraction pipeline. Line identity is
//! not stored; it is derived from item adjacency by [`Page::lines`].

use serde::{Deserialize, Serialize};

/// Bounding box in document units, bottom-up y-axis
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// True when every component is a finite number
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite()
    }

    /// Smallest box covering both boxes.
    ///
    /// `y` is the top edge in document space, so the union keeps the
    /// highest top and extends down to the lowest bottom.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        let left = self.x.min(other.x);
        let right = (self.x + self.width).max(other.x + other.width);
        let top = self.y.max(other.y);
        let bottom = (self.y - self.height).min(other.y - other.height);
        BoundingBox {
            x: left,
            y: top,
            width: right - left,
            height: top - bottom,
        }
    }
}

/// One laid-out text fragment on a page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextItem {
    #[serde(flatten)]
    pub bbox: BoundingBox,
    pub text: String,
}

impl TextItem {
    pub fn new(text: impl Into<String>, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            bbox: BoundingBox::new(x, y, width, height),
            text: text.into(),
        }
    }

    /// Merge a run of items into a single item covering all of them.
    ///
    /// Returns `None` for an empty run.
    pub fn merge<'a, I>(items: I) -> Option<TextItem>
    where
        I: IntoIterator<Item = &'a TextItem>,
    {
        let mut iter = items.into_iter();
        let first = iter.next()?;
        let mut bbox = first.bbox;
        let mut text = first.text.trim().to_string();

        for item in iter {
            bbox = bbox.union(&item.bbox);
            let fragment = item.text.trim();
            if fragment.is_empty() {
                continue;
            }
            if !text.is_empty() {
                text.push(' ');
            }
            text.push_str(fragment);
        }

        Some(TextItem { bbox, text })
    }
}

/// A derived line: consecutive items sharing a vertical position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// 1-based line number within the page
    pub number: u32,
    /// Indices into [`Page::items`]
    pub items: Vec<usize>,
}

/// One page of the source
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub items: Vec<TextItem>,
}

impl Page {
    pub fn new(items: Vec<TextItem>) -> Self {
        Self { items }
    }

    /// Group items into lines by adjacency.
    ///
    /// Items are walked in order. An item joins the current line when its
    /// `y` lies within `tolerance * max(item height, line height)` of the
    /// line's first item; otherwise it opens a new line.
    pub fn lines(&self, tolerance: f64) -> Vec<Line> {
        let mut lines: Vec<Line> = Vec::new();
        let mut reference: Option<(f64, f64)> = None;

        for (index, item) in self.items.iter().enumerate() {
            let same_line = match reference {
                Some((line_y, line_height)) => {
                    let slack = tolerance * item.bbox.height.max(line_height);
                    (item.bbox.y - line_y).abs() <= slack
                }
                None => false,
            };

            match lines.last_mut() {
                Some(line) if same_line => {
                    line.items.push(index);
                    if let Some((_, height)) = reference.as_mut() {
                        *height = height.max(item.bbox.height);
                    }
                }
                _ => {
                    lines.push(Line {
                        number: lines.len() as u32 + 1,
                        items: vec![index],
                    });
                    reference = Some((item.bbox.y, item.bbox.height));
                }
            }
        }

        lines
    }

    /// Raw text of a line, items joined by single spaces
    pub fn line_text(&self, line: &Line) -> String {
        line.items
            .iter()
            .filter_map(|&i| self.items.get(i))
            .map(|item| item.text.trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Ordered pages of extracted text, owned by the caller
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceLayout {
    #[serde(default)]
    pub pages: Vec<Page>,
}

impl SourceLayout {
    pub fn new(pages: Vec<Page>) -> Self {
        Self { pages }
    }

    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Page by 1-based number
    pub fn page(&self, number: u32) -> Option<&Page> {
        let index = (number as usize).checked_sub(1)?;
        self.pages.get(index)
    }

    /// Total bytes of extracted text across all pages
    pub fn text_bytes(&self) -> usize {
        self.pages
            .iter()
            .flat_map(|p| p.items.iter())
            .map(|item| item.text.len())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_group_by_vertical_position() {
        let page = Page::new(vec![
            TextItem::new("The quick", 10.0, 700.0, 50.0, 12.0),
            TextItem::new("brown fox", 62.0, 700.5, 50.0, 12.0),
            TextItem::new("jumps over", 10.0, 686.0, 50.0, 12.0),
        ]);

        let lines = page.lines(0.5);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].number, 1);
        assert_eq!(lines[0].items, vec![0, 1]);
        assert_eq!(lines[1].number, 2);
        assert_eq!(page.line_text(&lines[0]), "The quick brown fox");
    }

    #[test]
    fn test_empty_page_has_no_lines() {
        assert!(Page::default().lines(0.5).is_empty());
    }

    #[test]
    fn test_union_covers_both_boxes() {
        let a = BoundingBox::new(10.0, 100.0, 20.0, 10.0);
        let b = BoundingBox::new(40.0, 95.0, 10.0, 10.0);
        let u = a.union(&b);
        assert_eq!(u.x, 10.0);
        assert_eq!(u.y, 100.0);
        assert_eq!(u.width, 40.0);
        assert_eq!(u.height, 15.0);
    }

    #[test]
    fn test_merge_joins_text() {
        let items = vec![
            TextItem::new("net ", 0.0, 10.0, 10.0, 5.0),
            TextItem::new(" revenue", 12.0, 10.0, 20.0, 5.0),
        ];
        let merged = TextItem::merge(&items).unwrap();
        assert_eq!(merged.text, "net revenue");
        assert_eq!(merged.bbox.width, 32.0);
        assert!(TextItem::merge(Vec::<TextItem>::new().iter()).is_none());
    }

    #[test]
    fn test_page_lookup_is_one_based() {
        let layout = SourceLayout::new(vec![Page::default(), Page::default()]);
        assert!(layout.page(0).is_none());
        assert!(layout.page(1).is_some());
        assert!(layout.page(2).is_some());
        assert!(layout.page(3).is_none());
    }
}
