//! Bubble geometry
//!
//! Derives the visible bubble from content metrics:
//!
//! - corner radii from the merge flags of neighbouring messages
//! - the bottom-line decision, i.e. whether the trailing time/status
//!   indicator fits after the last line of content or needs a strip of its own
//! - the bubble frame and its clip descriptor

use bubbl_core::{clamp_unit, lerp, sanitize_extent, CornerRadius, EdgeInsets, Rect, Size};
use serde::{Deserialize, Serialize};

use crate::item::LastLine;

/// Bubble tunables
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BubbleConfig {
    /// Radius of every corner not adjacent to a merged neighbour
    pub base_radius: f32,
    /// Space between the bubble edge and its content
    pub padding: EdgeInsets,
    /// Clip path radii are the bubble radii divided by this
    pub clip_radius_divisor: f32,
    /// Whether the bubble may grow past its content to fit the time indicator
    pub allow_horizontal_extend: bool,
}

impl Default for BubbleConfig {
    fn default() -> Self {
        Self {
            base_radius: 18.0,
            padding: EdgeInsets::new(10.0, 7.0, 10.0, 7.0),
            clip_radius_divisor: 1.5,
            allow_horizontal_extend: true,
        }
    }
}

/// Where the trailing time indicator goes
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "width", rename_all = "snake_case")]
pub enum BottomLineWidth {
    /// The indicator gets a reserved strip below the content
    Expand,
    /// The indicator follows a last line of this width
    Keep(f32),
    /// Transitional width while two representations cross-fade
    Animated(f32),
}

impl BottomLineWidth {
    /// Pixel width for interpolation. `Expand` counts as the content width
    /// minus the indicator.
    pub fn resolve(&self, content_width: f32, time_width: f32) -> f32 {
        match *self {
            BottomLineWidth::Expand => (content_width - time_width).max(0.0),
            BottomLineWidth::Keep(w) | BottomLineWidth::Animated(w) => w,
        }
    }

    pub fn is_expand(&self) -> bool {
        matches!(self, BottomLineWidth::Expand)
    }
}

/// One side of a bottom-line cross-fade
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineEndpoint {
    pub line: BottomLineWidth,
    /// Content width of that representation
    pub content_width: f32,
}

/// Content metrics the bottom-line decision depends on
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ContentMetrics {
    /// Width of the laid-out content
    pub width: f32,
    /// Widest the content area may become
    pub max_width: f32,
}

/// Clip region for the bubble content
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ClipDescriptor {
    pub rect: Rect,
    pub radii: CornerRadius,
}

/// Final bubble shape handed to the renderer
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BubbleShape {
    pub bounds: Rect,
    pub radii: CornerRadius,
    pub merged_with_above: bool,
    pub merged_with_below: bool,
    pub clip: ClipDescriptor,
}

/// Outer and inner size of a bubble
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BubbleFrame {
    /// Size including padding
    pub outer: Size,
    /// Content area, time strip included
    pub inner: Size,
}

/// Corner radii of a bubble. A merged side has both adjacent corners at
/// exactly zero; every other corner is `radius`.
pub fn corner_radii(merged_above: bool, merged_below: bool, radius: f32) -> CornerRadius {
    let radius = sanitize_extent(radius);
    let top = if merged_above { 0.0 } else { radius };
    let bottom = if merged_below { 0.0 } else { radius };
    CornerRadius::new(top, top, bottom, bottom)
}

/// Stateless bubble geometry calculations
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BubbleGeometryEngine {
    pub config: BubbleConfig,
}

impl BubbleGeometryEngine {
    pub fn new(config: BubbleConfig) -> Self {
        Self { config }
    }

    pub fn corner_radii(&self, merged_above: bool, merged_below: bool) -> CornerRadius {
        corner_radii(merged_above, merged_below, self.config.base_radius)
    }

    /// Longest last line that can still be followed by the indicator
    pub fn max_line_width(&self, content: &ContentMetrics) -> f32 {
        let max_width = sanitize_extent(content.max_width);
        if self.config.allow_horizontal_extend {
            max_width
        } else {
            max_width.min(sanitize_extent(content.width))
        }
    }

    /// Bottom-line decision for a single, static representation.
    ///
    /// The indicator wraps onto its own strip when the last line plus the
    /// indicator would not fit.
    pub fn resolve_static(&self, raw: LastLine, content: &ContentMetrics, time_width: f32) -> BottomLineWidth {
        match raw {
            LastLine::Expand => BottomLineWidth::Expand,
            LastLine::Width(w) => {
                let w = sanitize_extent(w);
                if w + sanitize_extent(time_width) > self.max_line_width(content) {
                    BottomLineWidth::Expand
                } else {
                    BottomLineWidth::Keep(w)
                }
            }
        }
    }

    /// Bottom line while two representations cross-fade.
    ///
    /// Returns `from.line` exactly at `progress <= 0` and `to.line` exactly at
    /// `progress >= 1`; in between, the resolved widths are interpolated.
    pub fn resolve_crossfade(
        &self,
        from: LineEndpoint,
        to: LineEndpoint,
        progress: f32,
        time_width: f32,
    ) -> BottomLineWidth {
        if progress.is_nan() || progress <= 0.0 {
            return from.line;
        }
        if progress >= 1.0 {
            return to.line;
        }
        let start = from.line.resolve(from.content_width, time_width);
        let end = to.line.resolve(to.content_width, time_width);
        BottomLineWidth::Animated(lerp(start, end, progress))
    }

    /// Bubble size for `content` with the given bottom line.
    ///
    /// `expand_factor` is only read for [`BottomLineWidth::Animated`], where
    /// it blends between the fitted and the expanded frame.
    pub fn bubble_frame(&self, content: Size, line: BottomLineWidth, expand_factor: f32, time: Size) -> BubbleFrame {
        let content = content.sanitized();
        let time = time.sanitized();
        let expanded_width = if self.config.allow_horizontal_extend {
            content.width.max(time.width)
        } else {
            content.width
        };
        let expanded_height = content.height + time.height;

        let inner = match line {
            BottomLineWidth::Expand => Size::new(expanded_width, expanded_height),
            BottomLineWidth::Keep(w) => Size::new(content.width.max(sanitize_extent(w) + time.width), content.height),
            BottomLineWidth::Animated(w) => {
                let factor = clamp_unit(expand_factor);
                let fitted = content.width.max(sanitize_extent(w) + time.width);
                Size::new(
                    lerp(fitted, expanded_width, factor),
                    lerp(content.height, expanded_height, factor),
                )
            }
        };
        let padding = self.config.padding;
        BubbleFrame {
            outer: Size::new(inner.width + padding.horizontal(), inner.height + padding.vertical()),
            inner,
        }
    }

    /// Shape of a bubble occupying `bounds`
    pub fn bubble_shape(&self, bounds: Rect, merged_above: bool, merged_below: bool) -> BubbleShape {
        let radii = self.corner_radii(merged_above, merged_below);
        BubbleShape {
            bounds,
            radii,
            merged_with_above: merged_above,
            merged_with_below: merged_below,
            clip: ClipDescriptor {
                rect: bounds.inset_by(self.config.padding),
                radii: radii.scaled_down(self.config.clip_radius_divisor),
            },
        }
    }
}
