//! Album mosaic packing
//!
//! Media albums are packed into rows. Every contiguous split of the items
//! into rows is tried; a row's height follows from fitting its items, at their
//! (clamped) aspect ratios, to the full width:
//!
//! ```text
//! row_height = (width - (n - 1) * spacing) / Σ ratio
//! ```
//!
//! Splits whose rows all fall inside the configured height band win over
//! splits that do not. Among those, the total height closest to
//! `target_height_ratio * width` is chosen, with penalties for rows that get
//! sparser towards the bottom and for very short rows.

use bubbl_core::{sanitize_extent, Rect, Size};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::item::ListItem;
use crate::layout::{Arrangement, LayoutSummary, ListLayout};

/// Tunables of the album packer
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MosaicConfig {
    /// Gap between adjacent cells, both directions
    pub spacing: f32,
    /// Narrowest aspect ratio an item is cropped to inside a multi-item album
    pub min_item_ratio: f32,
    /// Widest aspect ratio an item is cropped to inside a multi-item album
    pub max_item_ratio: f32,
    /// Aspect ratio band of a lone item
    pub single_min_ratio: f32,
    pub single_max_ratio: f32,
    /// Minimum size of a lone item (width is capped by the box)
    pub single_min_width: f32,
    pub single_min_height: f32,
    pub max_rows: usize,
    pub max_items_per_row: usize,
    /// Row height band, as a fraction of the box width
    pub min_row_height_ratio: f32,
    pub max_row_height_ratio: f32,
    /// Preferred total height, as a fraction of the box width
    pub target_height_ratio: f32,
    /// Rows below this height are penalized
    pub min_row_height: f32,
    /// Multiplier applied to the cost of a penalized split
    pub penalty: f32,
}

impl MosaicConfig {
    /// Crop band for items of a multi-item album
    pub fn item_ratio_band(&self) -> (f32, f32) {
        let defaults = Self::default();
        ratio_band(
            self.min_item_ratio,
            self.max_item_ratio,
            (defaults.min_item_ratio, defaults.max_item_ratio),
        )
    }

    /// Crop band for a lone item
    pub fn single_ratio_band(&self) -> (f32, f32) {
        let defaults = Self::default();
        ratio_band(
            self.single_min_ratio,
            self.single_max_ratio,
            (defaults.single_min_ratio, defaults.single_max_ratio),
        )
    }
}

/// Usable `(min, max)` ratio band. Inverted bounds are swapped; non-finite or
/// non-positive ones give `fallback`.
fn ratio_band(min: f32, max: f32, fallback: (f32, f32)) -> (f32, f32) {
    let usable = |ratio: f32| ratio.is_finite() && ratio > 0.0;
    if !usable(min) || !usable(max) {
        tracing::warn!(min, max, "unusable mosaic ratio band, using defaults");
        return fallback;
    }
    if min > max {
        tracing::warn!(min, max, "inverted mosaic ratio band");
        return (max, min);
    }
    (min, max)
}

impl Default for MosaicConfig {
    fn default() -> Self {
        Self {
            spacing: 2.0,
            min_item_ratio: 0.66667,
            max_item_ratio: 1.7,
            single_min_ratio: 0.5,
            single_max_ratio: 2.5,
            single_min_width: 160.0,
            single_min_height: 120.0,
            max_rows: 4,
            max_items_per_row: 3,
            min_row_height_ratio: 0.2,
            max_row_height_ratio: 0.75,
            target_height_ratio: 4.0 / 3.0,
            min_row_height: 68.0,
            penalty: 1.5,
        }
    }
}

/// Which outer edges of the mosaic a cell touches
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellEdges {
    pub top: bool,
    pub bottom: bool,
    pub left: bool,
    pub right: bool,
}

impl CellEdges {
    pub const ALL: CellEdges = CellEdges {
        top: true,
        bottom: true,
        left: true,
        right: true,
    };

    /// Corners that should follow the bubble's rounding:
    /// `[top_left, top_right, bottom_right, bottom_left]`
    pub fn rounded_corners(&self) -> [bool; 4] {
        [
            self.top && self.left,
            self.top && self.right,
            self.bottom && self.right,
            self.bottom && self.left,
        ]
    }
}

/// One packed item
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MosaicCell {
    /// Index of the item in the input
    pub index: usize,
    pub rect: Rect,
    pub edges: CellEdges,
}

/// Result of packing
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Mosaic {
    /// One cell per input item, in input order. Degenerate items get a zero
    /// rect and no edges.
    pub cells: Vec<MosaicCell>,
    pub size: Size,
    /// Items per row, top to bottom
    pub rows: Vec<usize>,
}

type Rows = SmallVec<[usize; 4]>;

/// Packs media items into an album grid
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MosaicPacker {
    pub config: MosaicConfig,
}

impl MosaicPacker {
    pub fn new(config: MosaicConfig) -> Self {
        Self { config }
    }

    /// Pack `sizes` into a box `max_width` wide and at most `max_height`
    /// tall. A non-finite or non-positive `max_height` means unbounded.
    pub fn pack(&self, sizes: &[Size], max_width: f32, max_height: f32) -> Mosaic {
        let width = sanitize_extent(max_width);
        let height_limit = if max_height.is_finite() && max_height > 0.0 {
            max_height
        } else {
            f32::INFINITY
        };

        let mut cells: Vec<MosaicCell> = (0..sizes.len())
            .map(|index| MosaicCell {
                index,
                rect: Rect::ZERO,
                edges: CellEdges::default(),
            })
            .collect();

        let valid: Vec<(usize, f32)> = sizes
            .iter()
            .enumerate()
            .filter_map(|(i, size)| size.aspect_ratio().map(|ratio| (i, ratio)))
            .collect();

        if width == 0.0 || valid.is_empty() {
            return Mosaic {
                cells,
                size: Size::ZERO,
                rows: Vec::new(),
            };
        }

        if let [(index, ratio)] = valid[..] {
            let rect = self.fit_single(ratio, width, height_limit);
            cells[index].rect = rect;
            cells[index].edges = CellEdges::ALL;
            return Mosaic {
                cells,
                size: rect.size,
                rows: vec![1],
            };
        }

        let (min_ratio, max_ratio) = self.config.item_ratio_band();
        let ratios: Vec<f32> = valid
            .iter()
            .map(|&(_, r)| r.clamp(min_ratio, max_ratio))
            .collect();
        let rows = self.choose_rows(&ratios, width);
        tracing::trace!(items = ratios.len(), rows = ?rows, "mosaic rows chosen");

        let spacing = sanitize_extent(self.config.spacing);
        let mut packed = Vec::with_capacity(ratios.len());
        let mut y = 0.0;
        let mut start = 0;
        for (row, &count) in rows.iter().enumerate() {
            let row_ratios = &ratios[start..start + count];
            let row_height = row_height(row_ratios, width, spacing);
            let mut x = 0.0;
            for (k, ratio) in row_ratios.iter().enumerate() {
                let last = k + 1 == count;
                let cell_width = if last {
                    (width - x).max(0.0)
                } else {
                    ratio * row_height
                };
                packed.push((
                    Rect::new(x, y, cell_width, row_height),
                    CellEdges {
                        top: row == 0,
                        bottom: row + 1 == rows.len(),
                        left: k == 0,
                        right: last,
                    },
                ));
                x += cell_width + spacing;
            }
            y += row_height;
            if row + 1 < rows.len() {
                y += spacing;
            }
            start += count;
        }

        let scale = if y > height_limit { height_limit / y } else { 1.0 };
        let mut size = Size::ZERO;
        for ((index, _), (rect, edges)) in valid.iter().zip(packed) {
            let rect = scale_rect(rect, scale);
            size.width = size.width.max(rect.right());
            size.height = size.height.max(rect.bottom());
            cells[*index].rect = rect;
            cells[*index].edges = edges;
        }

        Mosaic {
            cells,
            size,
            rows: rows.to_vec(),
        }
    }

    fn fit_single(&self, ratio: f32, width: f32, height_limit: f32) -> Rect {
        let c = &self.config;
        let (min_ratio, max_ratio) = c.single_ratio_band();
        let ratio = ratio.clamp(min_ratio, max_ratio);
        let mut w = width.min(height_limit * ratio);
        let mut h = w / ratio;

        let min_width = width.min(c.single_min_width);
        if w < min_width {
            w = min_width;
            h = (w / ratio).min(height_limit);
        } else if h < c.single_min_height {
            h = c.single_min_height.min(height_limit);
            w = (h * ratio).min(width);
        }
        Rect::new(0.0, 0.0, w, h)
    }

    fn choose_rows(&self, ratios: &[f32], width: f32) -> Rows {
        let c = &self.config;
        let spacing = sanitize_extent(c.spacing);
        let band_min = c.min_row_height_ratio * width;
        let band_max = c.max_row_height_ratio * width;
        let target = c.target_height_ratio * width;

        let mut best: Option<(bool, f32, Rows)> = None;
        let mut current = Rows::new();
        for_each_split(
            ratios.len(),
            c.max_rows.max(1),
            c.max_items_per_row.max(1),
            &mut current,
            &mut |rows| {
                let mut heights: SmallVec<[f32; 4]> = SmallVec::new();
                let mut start = 0;
                for &count in rows {
                    heights.push(row_height(&ratios[start..start + count], width, spacing));
                    start += count;
                }
                let total: f32 =
                    heights.iter().sum::<f32>() + spacing * (heights.len() - 1) as f32;
                let in_band = heights.iter().all(|&h| h >= band_min && h <= band_max);

                let mut cost = (total - target).abs();
                if rows.windows(2).any(|pair| pair[0] > pair[1]) {
                    cost *= c.penalty;
                }
                if heights.iter().any(|&h| h < c.min_row_height) {
                    cost *= c.penalty;
                }

                let better = match &best {
                    None => true,
                    Some((best_in_band, best_cost, _)) => {
                        (in_band && !best_in_band) || (in_band == *best_in_band && cost < *best_cost)
                    }
                };
                if better {
                    best = Some((in_band, cost, SmallVec::from_slice(rows)));
                }
            },
        );

        match best {
            Some((_, _, rows)) => rows,
            None => fallback_rows(ratios.len(), c.max_items_per_row.max(1)),
        }
    }
}

/// Height of a row whose items share it and span `width`
fn row_height(ratios: &[f32], width: f32, spacing: f32) -> f32 {
    let sum: f32 = ratios.iter().sum();
    if sum <= 0.0 {
        return 0.0;
    }
    let gaps = spacing * ratios.len().saturating_sub(1) as f32;
    ((width - gaps) / sum).max(0.0)
}

/// Visit every split of `remaining` items into contiguous rows
fn for_each_split<F>(remaining: usize, max_rows: usize, max_per_row: usize, current: &mut Rows, visit: &mut F)
where
    F: FnMut(&[usize]),
{
    if remaining == 0 {
        if !current.is_empty() {
            visit(&current[..]);
        }
        return;
    }
    if current.len() == max_rows {
        return;
    }
    for count in 1..=remaining.min(max_per_row) {
        current.push(count);
        for_each_split(remaining - count, max_rows, max_per_row, current, visit);
        current.pop();
    }
}

/// Rows used when no split satisfies the row limits
fn fallback_rows(count: usize, per_row: usize) -> Rows {
    let mut rows = Rows::new();
    let mut left = count;
    while left > 0 {
        let take = left.min(per_row);
        rows.push(take);
        left -= take;
    }
    rows
}

fn scale_rect(rect: Rect, scale: f32) -> Rect {
    if scale == 1.0 {
        return rect;
    }
    Rect::new(
        rect.x() * scale,
        rect.y() * scale,
        rect.width() * scale,
        rect.height() * scale,
    )
}

// ============================================================================
// Layout adapter
// ============================================================================

/// [`ListLayout`] placing album members with a [`MosaicPacker`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MosaicLayout {
    pub packer: MosaicPacker,
    pub max_width: f32,
    pub max_height: f32,
}

impl MosaicLayout {
    pub fn new(config: MosaicConfig, max_width: f32, max_height: f32) -> Self {
        Self {
            packer: MosaicPacker::new(config),
            max_width,
            max_height,
        }
    }
}

impl ListLayout for MosaicLayout {
    fn arrange<T: ListItem>(&self, items: &[&T]) -> Arrangement {
        let sizes: Vec<Size> = items
            .iter()
            .map(|item| Size::new(item.width(), item.height()))
            .collect();
        let mosaic = self.packer.pack(&sizes, self.max_width, self.max_height);

        let rects: Vec<Rect> = mosaic.cells.iter().map(|cell| cell.rect).collect();
        let last_line_height = mosaic
            .cells
            .iter()
            .filter(|cell| cell.edges.bottom)
            .map(|cell| cell.rect.height())
            .fold(0.0, f32::max);
        Arrangement {
            summary: LayoutSummary {
                total_width: mosaic.size.width,
                total_height: mosaic.size.height,
                last_line_width: mosaic.size.width,
                last_line_height,
                max_item_width: rects.iter().map(Rect::width).fold(0.0, f32::max),
                trailing_expand: 0.0,
            },
            rects,
        }
    }
}
