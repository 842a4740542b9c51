//! bubbl Core
//!
//! Foundational types for the bubbl chat-bubble layout core:
//!
//! - **Geometry**: points, sizes, rects, insets and corner radii
//! - **Errors**: the contract-violation taxonomy shared by every crate
//! - **Observers**: the callback interface animators use to ask their owner
//!   for a re-layout or a redraw

pub mod error;
pub mod geometry;
pub mod observer;

pub use error::{report_contract_violation, LayoutError, Result};
pub use geometry::{
    clamp_unit, lerp, sanitize_extent, CornerRadius, EdgeInsets, Point, Rect, Size,
};
pub use observer::{
    noop_observer, CountingObserver, FnObserver, LayoutObserver, NoopObserver, SharedObserver,
};
