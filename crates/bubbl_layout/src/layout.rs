//! Layout strategies for list animators
//!
//! A [`ListLayout`] turns the items that are currently part of a list (items
//! fading out are excluded) into target rectangles plus a [`LayoutSummary`].
//! The animator interpolates towards both.

use bubbl_core::{sanitize_extent, Rect};
use serde::{Deserialize, Serialize};

use crate::item::{LastLine, ListItem};

/// Aggregate values of one arrangement
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LayoutSummary {
    pub total_width: f32,
    pub total_height: f32,
    pub last_line_width: f32,
    pub last_line_height: f32,
    pub max_item_width: f32,
    /// `1.0` when a trailing indicator (time/status) cannot share the last
    /// line and needs a line of its own
    pub trailing_expand: f32,
}

/// Output of [`ListLayout::arrange`]: one rect per input item, in order
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Arrangement {
    pub rects: Vec<Rect>,
    pub summary: LayoutSummary,
}

impl Arrangement {
    fn finish(rects: Vec<Rect>, mut summary: LayoutSummary) -> Self {
        summary.total_width = rects.iter().map(Rect::right).fold(0.0, f32::max);
        summary.max_item_width = rects.iter().map(Rect::width).fold(0.0, f32::max);
        Self { rects, summary }
    }
}

/// Strategy placing list items
pub trait ListLayout {
    fn arrange<T: ListItem>(&self, items: &[&T]) -> Arrangement;
}

// ============================================================================
// Vertical
// ============================================================================

/// Stacks items top to bottom using their spacing rules
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct VerticalLayout;

impl ListLayout for VerticalLayout {
    fn arrange<T: ListItem>(&self, items: &[&T]) -> Arrangement {
        let mut rects = Vec::with_capacity(items.len());
        let mut y = 0.0;
        let count = items.len();
        for (i, item) in items.iter().enumerate() {
            y += sanitize_extent(item.spacing_start(i == 0));
            let width = sanitize_extent(item.width());
            let height = sanitize_extent(item.height());
            rects.push(Rect::new(0.0, y, width, height));
            y += height + sanitize_extent(item.spacing_end(i + 1 == count));
        }

        let mut summary = LayoutSummary {
            total_height: y,
            ..LayoutSummary::default()
        };
        if let (Some(last), Some(rect)) = (items.last(), rects.last()) {
            let line = last.last_line();
            summary.last_line_width = line.resolve(rect.width()).min(rect.width());
            summary.last_line_height = rect.height();
            summary.trailing_expand = if line.is_expand() { 1.0 } else { 0.0 };
        }
        Arrangement::finish(rects, summary)
    }
}

// ============================================================================
// Flow
// ============================================================================

/// Tunables of a [`FlowLayout`]
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowSpacing {
    /// Horizontal gap between items of one line
    pub item_spacing: f32,
    /// Vertical gap between lines
    pub line_spacing: f32,
    /// Maximum items per line, `0` for no limit
    pub max_items_in_row: usize,
}

impl Default for FlowSpacing {
    fn default() -> Self {
        Self {
            item_spacing: 6.0,
            line_spacing: 6.0,
            max_items_in_row: 0,
        }
    }
}

/// Packs items left to right, wrapping when a line is full
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlowLayout {
    pub spacing: FlowSpacing,
    /// Available width; infinite disables wrapping
    pub max_width: f32,
    /// Width reserved after the last item for a trailing indicator
    pub trailing_width: f32,
    /// Always give the trailing indicator its own line
    pub force_expand: bool,
}

impl Default for FlowLayout {
    fn default() -> Self {
        Self::new(FlowSpacing::default(), f32::INFINITY)
    }
}

impl FlowLayout {
    pub fn new(spacing: FlowSpacing, max_width: f32) -> Self {
        Self {
            spacing,
            max_width,
            trailing_width: 0.0,
            force_expand: false,
        }
    }

    pub fn with_trailing(mut self, trailing_width: f32, force_expand: bool) -> Self {
        self.trailing_width = trailing_width;
        self.force_expand = force_expand;
        self
    }

    fn max_width(&self) -> f32 {
        if self.max_width.is_nan() || self.max_width <= 0.0 {
            0.0
        } else {
            self.max_width
        }
    }
}

impl ListLayout for FlowLayout {
    fn arrange<T: ListItem>(&self, items: &[&T]) -> Arrangement {
        let max_width = self.max_width();
        let item_spacing = sanitize_extent(self.spacing.item_spacing);
        let line_spacing = sanitize_extent(self.spacing.line_spacing);
        let max_in_row = self.spacing.max_items_in_row;

        let mut rects = Vec::with_capacity(items.len());
        let mut x = 0.0_f32;
        let mut y = 0.0_f32;
        let mut line_height = 0.0_f32;
        let mut in_row = 0usize;

        for item in items {
            let width = sanitize_extent(item.width());
            let height = sanitize_extent(item.height());
            if in_row > 0 {
                let overflows = x + item_spacing + width > max_width;
                let row_full = max_in_row > 0 && in_row >= max_in_row;
                if overflows || row_full {
                    y += line_height + line_spacing;
                    x = 0.0;
                    line_height = 0.0;
                    in_row = 0;
                } else {
                    x += item_spacing;
                }
            }
            rects.push(Rect::new(x, y, width, height));
            x += width;
            line_height = line_height.max(height);
            in_row += 1;
        }

        let trailing = sanitize_extent(self.trailing_width);
        let expand = self.force_expand || (trailing > 0.0 && x + trailing > max_width);
        let summary = LayoutSummary {
            total_height: if rects.is_empty() { 0.0 } else { y + line_height },
            last_line_width: x,
            last_line_height: line_height,
            trailing_expand: if expand { 1.0 } else { 0.0 },
            ..LayoutSummary::default()
        };
        Arrangement::finish(rects, summary)
    }
}

/// Resolve the trailing line of a summary into a [`LastLine`]
pub fn summary_last_line(summary: &LayoutSummary) -> LastLine {
    if summary.trailing_expand >= 1.0 {
        LastLine::Expand
    } else {
        LastLine::Width(summary.last_line_width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::test_support::{block, Block};

    fn refs(items: &[Block]) -> Vec<&Block> {
        items.iter().collect()
    }

    #[test]
    fn test_vertical_stacks_with_spacing() {
        let mut b = block("b", 80.0, 20.0);
        b.spacing = 4.0;
        let items = vec![block("a", 100.0, 30.0), b];
        let arrangement = VerticalLayout.arrange(&refs(&items));
        assert_eq!(arrangement.rects[0], Rect::new(0.0, 0.0, 100.0, 30.0));
        assert_eq!(arrangement.rects[1], Rect::new(0.0, 34.0, 80.0, 20.0));
        assert_eq!(arrangement.summary.total_height, 54.0);
        assert_eq!(arrangement.summary.total_width, 100.0);
        assert_eq!(arrangement.summary.last_line_width, 80.0);
        assert_eq!(arrangement.summary.trailing_expand, 0.0);
    }

    #[test]
    fn test_vertical_expand_last_line() {
        let mut a = block("a", 120.0, 40.0);
        a.last_line = Some(LastLine::Expand);
        let arrangement = VerticalLayout.arrange(&refs(&[a]));
        assert_eq!(arrangement.summary.last_line_width, 120.0);
        assert_eq!(arrangement.summary.trailing_expand, 1.0);
    }

    #[test]
    fn test_vertical_degenerate_sizes() {
        let items = vec![block("a", f32::NAN, -5.0), block("b", 10.0, 10.0)];
        let arrangement = VerticalLayout.arrange(&refs(&items));
        assert_eq!(arrangement.rects[0], Rect::ZERO);
        assert_eq!(arrangement.rects[1].y(), 0.0);
    }

    #[test]
    fn test_flow_wraps() {
        let items = vec![
            block("a", 40.0, 28.0),
            block("b", 40.0, 28.0),
            block("c", 40.0, 28.0),
        ];
        let layout = FlowLayout::new(FlowSpacing::default(), 100.0);
        let arrangement = layout.arrange(&refs(&items));
        assert_eq!(arrangement.rects[0], Rect::new(0.0, 0.0, 40.0, 28.0));
        assert_eq!(arrangement.rects[1], Rect::new(46.0, 0.0, 40.0, 28.0));
        assert_eq!(arrangement.rects[2], Rect::new(0.0, 34.0, 40.0, 28.0));
        assert_eq!(arrangement.summary.total_height, 62.0);
        assert_eq!(arrangement.summary.total_width, 86.0);
        assert_eq!(arrangement.summary.last_line_width, 40.0);
        assert_eq!(arrangement.summary.last_line_height, 28.0);
    }

    #[test]
    fn test_flow_max_items_in_row() {
        let items = vec![block("a", 10.0, 10.0), block("b", 10.0, 10.0)];
        let spacing = FlowSpacing {
            max_items_in_row: 1,
            ..FlowSpacing::default()
        };
        let arrangement = FlowLayout::new(spacing, 1000.0).arrange(&refs(&items));
        assert_eq!(arrangement.rects[1].x(), 0.0);
        assert_eq!(arrangement.rects[1].y(), 16.0);
    }

    #[test]
    fn test_flow_oversized_item_gets_own_line() {
        let items = vec![block("a", 150.0, 10.0)];
        let arrangement = FlowLayout::new(FlowSpacing::default(), 100.0).arrange(&refs(&items));
        assert_eq!(arrangement.rects[0].x(), 0.0);
        assert_eq!(arrangement.rects[0].y(), 0.0);
    }

    #[test]
    fn test_flow_trailing_expand() {
        let items = vec![block("a", 60.0, 28.0)];
        let fits = FlowLayout::new(FlowSpacing::default(), 100.0).with_trailing(30.0, false);
        assert_eq!(fits.arrange(&refs(&items)).summary.trailing_expand, 0.0);

        let wraps = FlowLayout::new(FlowSpacing::default(), 100.0).with_trailing(50.0, false);
        let summary = wraps.arrange(&refs(&items)).summary;
        assert_eq!(summary.trailing_expand, 1.0);
        assert_eq!(summary_last_line(&summary), LastLine::Expand);

        let forced = FlowLayout::new(FlowSpacing::default(), 100.0).with_trailing(0.0, true);
        assert_eq!(forced.arrange::<Block>(&[]).summary.trailing_expand, 1.0);
    }
}
