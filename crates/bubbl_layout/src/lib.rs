//! bubbl Layout
//!
//! Animated layout for chat bubbles whose content changes at any time.
//!
//! # Features
//!
//! - **List animation**: [`ListDiffAnimator`] diffs identity-keyed lists and
//!   fades items in and out while the rest move into place
//! - **Replacement**: [`ReplaceAnimator`] cross-fades a single slot
//! - **Layouts**: vertical stacks, wrapping flows and album mosaics
//! - **Reactions**: [`ReactionFlowLayout`] sizes and wraps reaction chips
//! - **Bubble geometry**: corner radii, bottom-line decision, frame and clip
//!
//! # Example
//!
//! ```ignore
//! use bubbl_layout::prelude::*;
//!
//! let mut list = ListDiffAnimator::new(VerticalLayout, noop_observer(), &AnimationConfig::default());
//! list.reset(blocks, true)?;
//! while list.tick(16.0) {
//!     for entry in list.entries() {
//!         draw(entry.item(), entry.rect(), entry.visibility());
//!     }
//! }
//! ```

pub mod bubble;
pub mod config;
pub mod item;
pub mod layout;
pub mod list_animator;
pub mod message;
pub mod mosaic;
pub mod reactions;
pub mod replace;

#[cfg(test)]
mod scenarios;

pub use bubble::{
    corner_radii, BottomLineWidth, BubbleConfig, BubbleFrame, BubbleGeometryEngine, BubbleShape,
    ClipDescriptor, ContentMetrics, LineEndpoint,
};
pub use config::LayoutConfig;
pub use item::{LastLine, ListItem};
pub use layout::{
    summary_last_line, Arrangement, FlowLayout, FlowSpacing, LayoutSummary, ListLayout,
    VerticalLayout,
};
pub use list_animator::{Entry, ListDiffAnimator, Metadata, ResetEvent};
pub use message::{ContentBlock, MessageBubble};
pub use mosaic::{CellEdges, Mosaic, MosaicCell, MosaicConfig, MosaicLayout, MosaicPacker};
pub use reactions::{
    combine, format_count, ChipContent, ChipMetrics, MonospaceMeasurer, ReactionChip,
    ReactionFlowLayout, ReactionSnapshot, SenderId, TextMeasurer,
};
pub use replace::{Crossfade, ReplaceAnimator};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::bubble::{BottomLineWidth, BubbleGeometryEngine, BubbleShape};
    pub use crate::item::{LastLine, ListItem};
    pub use crate::layout::{FlowLayout, VerticalLayout};
    pub use crate::list_animator::{ListDiffAnimator, ResetEvent};
    pub use crate::message::{ContentBlock, MessageBubble};
    pub use crate::mosaic::{MosaicLayout, MosaicPacker};
    pub use crate::reactions::{ReactionFlowLayout, ReactionSnapshot};
    pub use crate::replace::ReplaceAnimator;
    pub use bubbl_animation::AnimationConfig;
    pub use bubbl_core::{noop_observer, LayoutObserver, Rect, Size};
}
