//! Items managed by the list animators

use std::fmt::Debug;
use std::hash::Hash;

/// Width of the last line of an item
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LastLine {
    /// The last line ends at this x offset
    Width(f32),
    /// The item fills to its right edge
    Expand,
}

impl LastLine {
    /// Resolve to a pixel width, using `full_width` for [`LastLine::Expand`]
    pub fn resolve(&self, full_width: f32) -> f32 {
        match *self {
            LastLine::Width(w) => bubbl_core::sanitize_extent(w),
            LastLine::Expand => full_width,
        }
    }

    pub fn is_expand(&self) -> bool {
        matches!(self, LastLine::Expand)
    }
}

/// A content unit placed in an animated collection.
///
/// Identity must not depend on mutable display state: two values with the
/// same identity are the same item at different points in time.
///
/// The hook methods let an item carry its own animated sub-state through the
/// animator's prepare/apply/finish cycle. They default to no-ops.
pub trait ListItem {
    type Identity: Eq + Hash + Clone + Debug;

    fn identity(&self) -> Self::Identity;

    fn width(&self) -> f32;

    fn height(&self) -> f32;

    fn last_line(&self) -> LastLine {
        LastLine::Width(self.width())
    }

    /// Space before this item, `is_first` when nothing precedes it
    fn spacing_start(&self, _is_first: bool) -> f32 {
        0.0
    }

    /// Space after this item, `is_last` when nothing follows it
    fn spacing_end(&self, _is_last: bool) -> f32 {
        0.0
    }

    /// Whether the item has pending animated state of its own
    fn has_changes(&self) -> bool {
        false
    }

    /// Re-snapshot animated state before a new cycle
    fn prepare_changes(&mut self) {}

    /// Commit pending state without animating
    fn apply_changes(&mut self) {
        self.finish_animation(true);
    }

    /// Apply an animation frame, returning whether anything visible changed
    fn apply_animation(&mut self, _factor: f32) -> bool {
        false
    }

    fn finish_animation(&mut self, _apply_future: bool) {}

    /// Called on a new value replacing `previous` with the same identity,
    /// before it takes its place
    fn carry_over(&mut self, _previous: &Self)
    where
        Self: Sized,
    {
    }
}
