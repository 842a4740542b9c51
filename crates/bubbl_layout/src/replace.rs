//! Single-slot animator
//!
//! [`ReplaceAnimator`] holds at most one current value. Replacing it fades the
//! old value out while the new one fades in; during the cross-fade both
//! entries exist and their visibilities may sum to more than one.

use bubbl_animation::AnimationConfig;
use bubbl_core::SharedObserver;

use crate::item::ListItem;
use crate::layout::VerticalLayout;
use crate::list_animator::{Entry, ListDiffAnimator, Metadata};

/// Snapshot of a running (or settled) replacement
#[derive(Debug)]
pub struct Crossfade<'a, T> {
    /// Value fading out, if any
    pub from: Option<&'a T>,
    /// Current value, if any
    pub to: Option<&'a T>,
    /// How far the transition is, `1.0` when settled
    pub progress: f32,
}

impl<T> Crossfade<'_, T> {
    pub fn is_settled(&self) -> bool {
        self.from.is_none()
    }
}

/// Animator for a slot holding zero or one value
pub struct ReplaceAnimator<T: ListItem> {
    list: ListDiffAnimator<T, VerticalLayout>,
}

impl<T: ListItem> ReplaceAnimator<T> {
    pub fn new(observer: SharedObserver, config: &AnimationConfig) -> Self {
        Self {
            list: ListDiffAnimator::new(VerticalLayout, observer, config),
        }
    }

    /// Replace the current value.
    ///
    /// At most two entries co-exist. When a replace lands mid-fade, the
    /// outgoing values compete and only the most visible one keeps fading;
    /// the other disappears at once, so its alpha pops to zero.
    pub fn replace(&mut self, value: Option<T>, animated: bool) {
        let incoming = value.as_ref().map(ListItem::identity);
        self.list
            .keep_most_visible(|item| Some(item.identity()) != incoming);
        self.list.reset_single(value, animated);
    }

    pub fn measure(&mut self, animated: bool) {
        self.list.measure(animated);
    }

    pub fn clear(&mut self, animated: bool) {
        self.list.clear(animated);
    }

    /// The settled value
    pub fn value(&self) -> Option<&T> {
        self.list.items().next()
    }

    /// Edit the current value in place; call [`measure`](Self::measure) if
    /// its size changed
    pub fn update<F>(&mut self, f: F) -> bool
    where
        F: FnOnce(&mut T),
    {
        match self.value().map(ListItem::identity) {
            Some(identity) => self.list.update(&identity, f),
            None => false,
        }
    }

    pub fn crossfade(&self) -> Crossfade<'_, T> {
        let leaving = self.list.entries().find(|e| e.is_removing());
        let current = self.list.entries().find(|e| !e.is_removing());
        let progress = match (current, leaving) {
            (Some(to), _) => to.visibility(),
            (None, Some(from)) => 1.0 - from.visibility(),
            (None, None) => 1.0,
        };
        Crossfade {
            from: leaving.map(Entry::item),
            to: current.map(Entry::item),
            progress,
        }
    }

    pub fn entries(&self) -> std::slice::Iter<'_, Entry<T>> {
        self.list.entries()
    }

    pub fn metadata(&self) -> &Metadata {
        self.list.metadata()
    }

    pub fn visibility_sum(&self) -> f32 {
        self.list.visibility_sum()
    }

    pub fn tick(&mut self, dt_ms: f32) -> bool {
        self.list.tick(dt_ms)
    }

    pub fn apply_animation(&mut self, factor: f32) {
        self.list.apply_animation(factor);
    }

    pub fn stop_animation(&mut self) {
        self.list.stop_animation();
    }

    pub fn is_animating(&self) -> bool {
        self.list.is_animating()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::test_support::{block, Block};
    use bubbl_animation::Easing;
    use bubbl_core::noop_observer;

    fn animator() -> ReplaceAnimator<Block> {
        let config = AnimationConfig {
            duration_ms: 100.0,
            easing: Easing::Linear,
        };
        ReplaceAnimator::new(noop_observer(), &config)
    }

    #[test]
    fn test_crossfade_sums_above_one() {
        let mut slot = animator();
        slot.replace(Some(block("a", 100.0, 40.0)), false);
        slot.replace(Some(block("b", 60.0, 20.0)), true);
        assert_eq!(slot.entries().count(), 2);
        slot.tick(50.0);

        let fade = slot.crossfade();
        assert_eq!(fade.from.map(|b| b.id), Some("a"));
        assert_eq!(fade.to.map(|b| b.id), Some("b"));
        assert!((fade.progress - 0.5).abs() < 1e-5);
        assert!((slot.visibility_sum() - 1.0).abs() < 1e-5);
        assert!((slot.metadata().total_height() - 30.0).abs() < 1e-4);

        slot.tick(50.0);
        assert!(slot.crossfade().is_settled());
        assert_eq!(slot.value().map(|b| b.id), Some("b"));
        assert_eq!(slot.metadata().total_height(), 20.0);
    }

    #[test]
    fn test_at_most_two_entries() {
        let mut slot = animator();
        slot.replace(Some(block("a", 10.0, 10.0)), false);
        slot.replace(Some(block("b", 10.0, 10.0)), true);
        slot.tick(30.0);
        slot.replace(Some(block("c", 10.0, 10.0)), true);
        assert_eq!(slot.entries().count(), 2);
        let ids: Vec<_> = slot.entries().map(|e| e.item().id).collect();
        assert!(ids.contains(&"a") && ids.contains(&"c"));

        // "a" was the more visible outgoing value and keeps fading from there
        let a = slot.entries().find(|e| e.item().id == "a").unwrap();
        assert!(a.is_removing());
        assert!((a.visibility() - 0.7).abs() < 1e-5);
    }

    #[test]
    fn test_late_replace_keeps_incoming_fade() {
        let mut slot = animator();
        slot.replace(Some(block("a", 10.0, 10.0)), false);
        slot.replace(Some(block("b", 10.0, 10.0)), true);
        slot.tick(80.0);
        slot.replace(Some(block("c", 10.0, 10.0)), true);
        let ids: Vec<_> = slot.entries().map(|e| e.item().id).collect();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&"b") && ids.contains(&"c"));
        let b = slot.entries().find(|e| e.item().id == "b").unwrap();
        assert!((b.visibility() - 0.8).abs() < 1e-5);
    }

    #[test]
    fn test_returning_value_keeps_its_fade() {
        let mut slot = animator();
        slot.replace(Some(block("a", 10.0, 10.0)), false);
        slot.replace(Some(block("b", 10.0, 10.0)), true);
        slot.tick(30.0);
        slot.replace(Some(block("a", 10.0, 10.0)), true);
        let a = slot.entries().find(|e| e.item().id == "a").unwrap();
        assert!((a.visibility() - 0.7).abs() < 1e-5);
        assert_eq!(slot.entries().count(), 2);
    }

    #[test]
    fn test_replace_with_none() {
        let mut slot = animator();
        slot.replace(Some(block("a", 10.0, 10.0)), false);
        slot.replace(None, true);
        assert!(slot.value().is_none());
        let fade = slot.crossfade();
        assert!(fade.to.is_none());
        assert_eq!(fade.progress, 0.0);
        slot.stop_animation();
        assert_eq!(slot.entries().count(), 0);
        assert_eq!(slot.metadata().total_height(), 0.0);
    }

    #[test]
    fn test_update_in_place() {
        let mut slot = animator();
        slot.replace(Some(block("a", 10.0, 10.0)), false);
        assert!(slot.update(|b| b.width = 20.0));
        slot.measure(false);
        assert_eq!(slot.metadata().total_width(), 20.0);
    }
}
