//! Message bubble integration
//!
//! [`MessageBubble`] wires the pieces together for one chat message: the
//! content slot cross-fades between representations, reaction chips flow
//! below it, and the bubble frame and shape are derived from both on demand.

use bubbl_animation::AnimationConfig;
use bubbl_core::{report_contract_violation, Point, Rect, SharedObserver, Size};
use serde::{Deserialize, Serialize};

use crate::bubble::{
    BottomLineWidth, BubbleFrame, BubbleGeometryEngine, BubbleShape, ContentMetrics, LineEndpoint,
};
use crate::config::LayoutConfig;
use crate::item::{LastLine, ListItem};
use crate::layout::summary_last_line;
use crate::list_animator::{Entry, Metadata};
use crate::reactions::{ReactionFlowLayout, ReactionSnapshot, TextMeasurer};
use crate::replace::ReplaceAnimator;

/// One representation of a message's content, as measured by the caller
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContentBlock {
    /// Stable identity of this representation
    pub id: u64,
    pub width: f32,
    pub height: f32,
    /// Width of the last text line; `None` fills to the edge
    #[serde(default)]
    pub last_line_width: Option<f32>,
}

impl ContentBlock {
    pub fn new(id: u64, width: f32, height: f32) -> Self {
        Self {
            id,
            width,
            height,
            last_line_width: None,
        }
    }

    pub fn with_last_line(mut self, width: f32) -> Self {
        self.last_line_width = Some(width);
        self
    }
}

impl ListItem for ContentBlock {
    type Identity = u64;

    fn identity(&self) -> u64 {
        self.id
    }

    fn width(&self) -> f32 {
        self.width
    }

    fn height(&self) -> f32 {
        self.height
    }

    fn last_line(&self) -> LastLine {
        match self.last_line_width {
            Some(w) => LastLine::Width(w),
            None => LastLine::Expand,
        }
    }
}

/// Layout state of one chat message
pub struct MessageBubble {
    engine: BubbleGeometryEngine,
    content: ReplaceAnimator<ContentBlock>,
    reactions: ReactionFlowLayout,
    reactions_spacing: f32,
    merged_above: bool,
    merged_below: bool,
    max_content_width: f32,
    time: Size,
}

impl MessageBubble {
    pub fn new(config: &LayoutConfig, observer: SharedObserver, measurer: Box<dyn TextMeasurer>) -> Self {
        Self {
            engine: BubbleGeometryEngine::new(config.bubble),
            content: ReplaceAnimator::new(observer.clone(), &config.animation),
            reactions: ReactionFlowLayout::new(observer, config.chips, &config.animation, measurer),
            reactions_spacing: config.chips.spacing.line_spacing,
            merged_above: false,
            merged_below: false,
            max_content_width: f32::INFINITY,
            time: Size::ZERO,
        }
    }

    /// Replace the content representation
    pub fn set_content(&mut self, content: Option<ContentBlock>, animated: bool) {
        self.content.replace(content, animated);
    }

    pub fn set_reactions(&mut self, reactions: &[ReactionSnapshot], animated: bool) {
        if let Err(err) = self.reactions.set_reactions(reactions, animated) {
            report_contract_violation("MessageBubble::set_reactions", &err);
        }
    }

    /// Merge flags supplied by the surrounding list
    pub fn set_merged(&mut self, above: bool, below: bool) {
        self.merged_above = above;
        self.merged_below = below;
    }

    pub fn set_max_content_width(&mut self, max_width: f32, animated: bool) {
        self.max_content_width = max_width;
        self.reactions.set_max_width(max_width, animated);
    }

    /// Size of the trailing time/status indicator
    pub fn set_time_size(&mut self, time: Size, animated: bool) {
        self.time = time.sanitized();
        self.reactions.set_trailing(self.time.width, false, animated);
    }

    pub fn content(&self) -> &ReplaceAnimator<ContentBlock> {
        &self.content
    }

    pub fn reactions(&self) -> &ReactionFlowLayout {
        &self.reactions
    }

    /// Content metadata
    pub fn metadata(&self) -> &Metadata {
        self.content.metadata()
    }

    /// Content entries for drawing and hit-testing
    pub fn entries(&self) -> std::slice::Iter<'_, Entry<ContentBlock>> {
        self.content.entries()
    }

    /// Where the reactions block starts, relative to the content area
    pub fn reactions_origin(&self) -> Point {
        let reactions = self.reactions.metadata();
        Point::new(
            0.0,
            self.metadata().total_height() + self.reactions_spacing * reactions.visibility(),
        )
    }

    /// Content plus reactions, time indicator excluded
    pub fn content_size(&self) -> Size {
        let content = self.metadata();
        let reactions = self.reactions.metadata();
        let reactions_height = if reactions.visibility() > 0.0 {
            reactions.total_height() + self.reactions_spacing * reactions.visibility()
        } else {
            0.0
        };
        Size::new(
            content.total_width().max(reactions.total_width()),
            content.total_height() + reactions_height,
        )
    }

    /// Trailing-edge width used for time placement
    pub fn bottom_line_width(&self) -> BottomLineWidth {
        let time_width = self.time.width;
        let metrics = ContentMetrics {
            width: self.content_size().width,
            max_width: self.max_content_width,
        };

        let reactions = self.reactions.metadata();
        if !reactions.is_empty() {
            let factor = reactions.trailing_expand();
            let last_line = reactions.last_line_width();
            return if factor >= 1.0 {
                BottomLineWidth::Expand
            } else if factor <= 0.0 {
                BottomLineWidth::Keep(last_line)
            } else {
                let from = LineEndpoint {
                    line: BottomLineWidth::Keep(last_line),
                    content_width: metrics.width,
                };
                let to = LineEndpoint {
                    line: BottomLineWidth::Expand,
                    content_width: metrics.width,
                };
                self.engine.resolve_crossfade(from, to, factor, time_width)
            };
        }

        let fade = self.content.crossfade();
        let resolve = |block: Option<&ContentBlock>| match block {
            Some(block) => {
                let own = ContentMetrics {
                    width: block.width,
                    ..metrics
                };
                LineEndpoint {
                    line: self.engine.resolve_static(block.last_line(), &own, time_width),
                    content_width: block.width,
                }
            }
            None => LineEndpoint {
                line: BottomLineWidth::Keep(0.0),
                content_width: 0.0,
            },
        };
        match fade.from {
            None => resolve(fade.to).line,
            Some(from) => {
                self.engine
                    .resolve_crossfade(resolve(Some(from)), resolve(fade.to), fade.progress, time_width)
            }
        }
    }

    /// Fraction of the time strip currently expanded
    fn expand_factor(&self) -> f32 {
        let reactions = self.reactions.metadata();
        if !reactions.is_empty() {
            return reactions.trailing_expand();
        }
        let fade = self.content.crossfade();
        let expands = |block: Option<&ContentBlock>| match block {
            Some(block) => {
                let metrics = ContentMetrics {
                    width: block.width,
                    max_width: self.max_content_width,
                };
                let line = self.engine.resolve_static(block.last_line(), &metrics, self.time.width);
                if line.is_expand() {
                    1.0
                } else {
                    0.0
                }
            }
            None => 0.0,
        };
        match fade.from {
            None => expands(fade.to),
            Some(from) => bubbl_core::lerp(expands(Some(from)), expands(fade.to), fade.progress),
        }
    }

    pub fn frame(&self) -> BubbleFrame {
        self.engine.bubble_frame(
            self.content_size(),
            self.bottom_line_width(),
            self.expand_factor(),
            self.time,
        )
    }

    /// Shape of the bubble placed at `origin`
    pub fn bubble_shape(&self, origin: Point) -> BubbleShape {
        let frame = self.frame();
        let bounds = Rect {
            origin,
            size: frame.outer,
        };
        self.engine
            .bubble_shape(bounds, self.merged_above, self.merged_below)
    }

    /// Advance every animator of the message. Returns whether any frame was
    /// applied.
    pub fn tick(&mut self, dt_ms: f32) -> bool {
        let content = self.content.tick(dt_ms);
        let reactions = self.reactions.tick(dt_ms);
        content || reactions
    }

    pub fn is_animating(&self) -> bool {
        self.content.is_animating() || self.reactions.is_animating()
    }

    /// Jump every animation to its end state
    pub fn stop_animation(&mut self) {
        self.content.stop_animation();
        self.reactions.stop_animation();
    }

    /// Release all content, e.g. on teardown
    pub fn clear(&mut self) {
        self.content.clear(false);
        self.reactions.clear(false);
    }

    /// Trailing line of the reactions block, if it has any chips
    pub fn reactions_last_line(&self) -> Option<LastLine> {
        if self.reactions.is_empty() {
            return None;
        }
        let metadata = self.reactions.metadata();
        Some(summary_last_line(&crate::layout::LayoutSummary {
            last_line_width: metadata.last_line_width(),
            trailing_expand: metadata.trailing_expand(),
            ..Default::default()
        }))
    }
}

impl Default for MessageBubble {
    fn default() -> Self {
        Self::new(
            &LayoutConfig::default(),
            bubbl_core::noop_observer(),
            Box::new(crate::reactions::MonospaceMeasurer::default()),
        )
    }
}
