//! Identity-keyed list animator
//!
//! [`ListDiffAnimator`] owns an ordered collection of items and animates the
//! transition whenever the collection is replaced:
//!
//! - items whose identity persists keep their [`Entry`] and move to their new
//!   position
//! - new items fade in from visibility 0
//! - removed items fade out in place and are dropped once invisible
//!
//! One [`FactorClock`] drives every value of the list. Frames are pushed in
//! from outside through [`ListDiffAnimator::tick`].

use std::fmt;

use bubbl_animation::{AnimatedValue, AnimationConfig, FactorClock};
use bubbl_core::{LayoutError, Rect, Result, SharedObserver};
use rustc_hash::FxHashMap;

use crate::item::ListItem;
use crate::layout::{LayoutSummary, ListLayout, VerticalLayout};

// ============================================================================
// Entry
// ============================================================================

/// One item of a [`ListDiffAnimator`] with its animated placement
pub struct Entry<T: ListItem> {
    item: T,
    index: usize,
    position: AnimatedValue<f32>,
    visibility: AnimatedValue<f32>,
    rect: AnimatedValue<Rect>,
    removing: bool,
}

impl<T: ListItem> Entry<T> {
    fn new(item: T, index: usize, visible: bool) -> Self {
        Self {
            item,
            index,
            position: AnimatedValue::new(index as f32),
            visibility: AnimatedValue::new(if visible { 1.0 } else { 0.0 }),
            rect: AnimatedValue::new(Rect::ZERO),
            removing: false,
        }
    }

    pub fn item(&self) -> &T {
        &self.item
    }

    /// Index in the target list. Leaving entries keep their last index.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Interpolated index, for renderers that need fractional ordering
    pub fn position(&self) -> f32 {
        self.position.get()
    }

    pub fn visibility(&self) -> f32 {
        self.visibility.get()
    }

    pub fn rect(&self) -> Rect {
        *self.rect.value()
    }

    /// The rect this entry is moving towards
    pub fn target_rect(&self) -> Rect {
        *self.rect.target()
    }

    /// True while the entry fades out after being removed
    pub fn is_removing(&self) -> bool {
        self.removing
    }

    fn prepare(&mut self) {
        self.position.prepare();
        self.visibility.prepare();
        self.rect.prepare();
        self.item.prepare_changes();
    }

    fn has_changes(&self) -> bool {
        self.position.has_changes()
            || self.visibility.has_changes()
            || self.rect.has_changes()
            || self.item.has_changes()
    }

    fn apply(&mut self, factor: f32) -> bool {
        let mut changed = self.position.apply(factor);
        changed |= self.visibility.apply(factor);
        changed |= self.rect.apply(factor);
        changed |= self.item.apply_animation(factor);
        changed
    }

    fn finish(&mut self, apply_future: bool) -> bool {
        let mut changed = self.position.finish(apply_future);
        changed |= self.visibility.finish(apply_future);
        changed |= self.rect.finish(apply_future);
        self.item.finish_animation(apply_future);
        changed
    }
}

impl<T: ListItem + fmt::Debug> fmt::Debug for Entry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("item", &self.item)
            .field("index", &self.index)
            .field("visibility", &self.visibility.get())
            .field("rect", self.rect.value())
            .field("removing", &self.removing)
            .finish()
    }
}

// ============================================================================
// Metadata
// ============================================================================

/// Animated aggregate values of a list
#[derive(Clone, Debug, Default)]
pub struct Metadata {
    size: AnimatedValue<f32>,
    visibility: AnimatedValue<f32>,
    total_width: AnimatedValue<f32>,
    total_height: AnimatedValue<f32>,
    last_line_width: AnimatedValue<f32>,
    last_line_height: AnimatedValue<f32>,
    max_item_width: AnimatedValue<f32>,
    trailing_expand: AnimatedValue<f32>,
}

/// What a metadata frame changed
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct MetadataChange {
    bounds: bool,
    other: bool,
}

impl Metadata {
    /// Animated item count
    pub fn size(&self) -> f32 {
        self.size.get()
    }

    /// `1.0` when the list is non-empty, animated
    pub fn visibility(&self) -> f32 {
        self.visibility.get()
    }

    pub fn total_width(&self) -> f32 {
        self.total_width.get()
    }

    pub fn total_height(&self) -> f32 {
        self.total_height.get()
    }

    pub fn last_line_width(&self) -> f32 {
        self.last_line_width.get()
    }

    pub fn last_line_height(&self) -> f32 {
        self.last_line_height.get()
    }

    pub fn max_item_width(&self) -> f32 {
        self.max_item_width.get()
    }

    /// Fraction in `[0, 1]` of the trailing indicator's own line
    pub fn trailing_expand(&self) -> f32 {
        self.trailing_expand.get()
    }

    /// Item count after the running animation completes
    pub fn target_size(&self) -> usize {
        self.size.get_target().round() as usize
    }

    pub fn target_total_width(&self) -> f32 {
        self.total_width.get_target()
    }

    pub fn target_total_height(&self) -> f32 {
        self.total_height.get_target()
    }

    pub fn is_empty(&self) -> bool {
        self.target_size() == 0
    }

    fn values_mut(&mut self) -> [&mut AnimatedValue<f32>; 8] {
        [
            &mut self.size,
            &mut self.visibility,
            &mut self.total_width,
            &mut self.total_height,
            &mut self.last_line_width,
            &mut self.last_line_height,
            &mut self.max_item_width,
            &mut self.trailing_expand,
        ]
    }

    fn set_targets(&mut self, summary: &LayoutSummary, count: usize, animated: bool) {
        let targets = [
            count as f32,
            if count > 0 { 1.0 } else { 0.0 },
            summary.total_width,
            summary.total_height,
            summary.last_line_width,
            summary.last_line_height,
            summary.max_item_width,
            summary.trailing_expand,
        ];
        for (value, target) in self.values_mut().into_iter().zip(targets) {
            if animated {
                value.set_to(target);
            } else {
                value.set(target);
            }
        }
    }

    fn prepare(&mut self) {
        for value in self.values_mut() {
            value.prepare();
        }
    }

    fn has_changes(&self) -> bool {
        self.size.has_changes()
            || self.visibility.has_changes()
            || self.total_width.has_changes()
            || self.total_height.has_changes()
            || self.last_line_width.has_changes()
            || self.last_line_height.has_changes()
            || self.max_item_width.has_changes()
            || self.trailing_expand.has_changes()
    }

    fn apply(&mut self, factor: f32) -> MetadataChange {
        let mut change = MetadataChange::default();
        change.bounds |= self.total_width.apply(factor);
        change.bounds |= self.total_height.apply(factor);
        for value in [
            &mut self.size,
            &mut self.visibility,
            &mut self.last_line_width,
            &mut self.last_line_height,
            &mut self.max_item_width,
            &mut self.trailing_expand,
        ] {
            change.other |= value.apply(factor);
        }
        change
    }

    fn finish(&mut self, apply_future: bool) -> MetadataChange {
        let mut change = MetadataChange::default();
        change.bounds |= self.total_width.finish(apply_future);
        change.bounds |= self.total_height.finish(apply_future);
        for value in [
            &mut self.size,
            &mut self.visibility,
            &mut self.last_line_width,
            &mut self.last_line_height,
            &mut self.max_item_width,
            &mut self.trailing_expand,
        ] {
            change.other |= value.finish(apply_future);
        }
        change
    }
}

// ============================================================================
// Animator
// ============================================================================

/// Membership change reported by [`ListDiffAnimator::reset_with`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResetEvent {
    /// The item joined the list. `returned` is true when it was still fading
    /// out from an earlier removal.
    Added { returned: bool },
    /// The item left the list
    Removed,
}

/// Ordered, identity-keyed collection with animated membership changes
pub struct ListDiffAnimator<T: ListItem, L: ListLayout = VerticalLayout> {
    entries: Vec<Entry<T>>,
    metadata: Metadata,
    layout: L,
    clock: FactorClock,
    observer: SharedObserver,
}

impl<T: ListItem, L: ListLayout> ListDiffAnimator<T, L> {
    pub fn new(layout: L, observer: SharedObserver, config: &AnimationConfig) -> Self {
        Self {
            entries: Vec::new(),
            metadata: Metadata::default(),
            layout,
            clock: FactorClock::from_config(config),
            observer,
        }
    }

    pub fn layout(&self) -> &L {
        &self.layout
    }

    /// Mutable access to the layout. Call [`measure`](Self::measure) after
    /// changing it.
    pub fn layout_mut(&mut self) -> &mut L {
        &mut self.layout
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Entries in display order, leaving entries included.
    ///
    /// The iterator borrows the animator, so entries cannot change while a
    /// frame holds it; call again to restart.
    pub fn entries(&self) -> std::slice::Iter<'_, Entry<T>> {
        self.entries.iter()
    }

    /// Items that are part of the list, leaving ones excluded
    pub fn items(&self) -> impl Iterator<Item = &T> + '_ {
        self.entries
            .iter()
            .filter(|e| !e.removing)
            .map(|e| &e.item)
    }

    pub fn len(&self) -> usize {
        self.entries.iter().filter(|e| !e.removing).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sum of all entry visibilities. May exceed the item count's visible
    /// share while entries cross-fade.
    pub fn visibility_sum(&self) -> f32 {
        self.entries.iter().map(Entry::visibility).sum()
    }

    pub fn is_animating(&self) -> bool {
        self.clock.is_running()
    }

    pub fn get(&self, identity: &T::Identity) -> Option<&T> {
        self.entries
            .iter()
            .find(|e| !e.removing && e.item.identity() == *identity)
            .map(|e| &e.item)
    }

    /// Edit an item in place. Call [`measure`](Self::measure) afterwards if
    /// its size changed. Returns false when no such item is in the list.
    pub fn update<F>(&mut self, identity: &T::Identity, f: F) -> bool
    where
        F: FnOnce(&mut T),
    {
        match self
            .entries
            .iter_mut()
            .find(|e| !e.removing && e.item.identity() == *identity)
        {
            Some(entry) => {
                f(&mut entry.item);
                true
            }
            None => false,
        }
    }

    /// Whether the list, leaving entries ignored, has exactly these
    /// identities in this order
    pub fn compare_contents(&self, items: &[T]) -> bool {
        let mut current = self.items();
        for item in items {
            match current.next() {
                Some(existing) if existing.identity() == item.identity() => {}
                _ => return false,
            }
        }
        current.next().is_none()
    }

    /// Replace the list.
    ///
    /// Fails with [`LayoutError::DuplicateIdentity`] when two items share an
    /// identity; the animator is left untouched in that case.
    pub fn reset(&mut self, items: Vec<T>, animated: bool) -> Result<()> {
        self.reset_with(items, animated, |_, _| {})
    }

    /// [`reset`](Self::reset), reporting every membership change
    pub fn reset_with<F>(&mut self, items: Vec<T>, animated: bool, on_change: F) -> Result<()>
    where
        F: FnMut(&T, ResetEvent),
    {
        let positions = index_identities(&items)?;
        self.reset_checked(items, positions, animated, on_change);
        Ok(())
    }

    /// Reset to at most one item, which can never collide
    pub(crate) fn reset_single(&mut self, item: Option<T>, animated: bool) {
        let mut positions = FxHashMap::default();
        if let Some(item) = &item {
            positions.insert(item.identity(), 0);
        }
        self.reset_checked(item.into_iter().collect(), positions, animated, |_, _| {});
    }

    /// Of the entries `outgoing` selects, keep only the most visible one
    pub(crate) fn keep_most_visible<F>(&mut self, outgoing: F)
    where
        F: Fn(&T) -> bool,
    {
        let keep = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| outgoing(&e.item))
            .max_by(|(_, a), (_, b)| a.visibility().total_cmp(&b.visibility()))
            .map(|(index, _)| index);
        let mut index = 0;
        self.entries.retain(|e| {
            let current = index;
            index += 1;
            !outgoing(&e.item) || Some(current) == keep
        });
    }

    /// Remove every item
    pub fn clear(&mut self, animated: bool) {
        self.reset_checked(Vec::new(), FxHashMap::default(), animated, |_, _| {});
    }

    /// Re-arrange the current items, animating towards the new layout
    pub fn measure(&mut self, animated: bool) {
        if animated && self.clock.duration_ms() > 0.0 {
            self.clock.cancel();
            self.prepare_all();
            self.measure_impl(true);
            self.start_if_changed();
        } else {
            let before = self.bounds();
            self.stop_animation();
            self.measure_impl(false);
            self.notify_static(before);
        }
    }

    /// Advance the animation by `dt_ms`. Returns whether a frame was applied.
    pub fn tick(&mut self, dt_ms: f32) -> bool {
        match self.clock.advance(dt_ms) {
            Some(factor) => {
                self.apply_animation(factor);
                true
            }
            None => false,
        }
    }

    /// Apply an animation frame directly.
    ///
    /// At `factor >= 1.0` every value settles and leaving entries are
    /// dropped.
    pub fn apply_animation(&mut self, factor: f32) {
        let mut changed = false;
        for entry in &mut self.entries {
            changed |= entry.apply(factor);
        }
        let mut change = self.metadata.apply(factor);
        if factor >= 1.0 {
            self.clock.cancel();
            for entry in &mut self.entries {
                changed |= entry.finish(true);
            }
            let meta = self.metadata.finish(true);
            change.bounds |= meta.bounds;
            change.other |= meta.other;
            changed |= self.remove_junk();
        }
        self.notify(change.bounds, changed || change.other);
    }

    /// Jump to the end of the running animation
    pub fn stop_animation(&mut self) {
        if self.clock.is_running() || self.has_changes() {
            self.apply_animation(1.0);
        } else {
            self.clock.cancel();
        }
    }

    // ------------------------------------------------------------------------

    fn reset_checked<F>(
        &mut self,
        items: Vec<T>,
        positions: FxHashMap<T::Identity, usize>,
        animated: bool,
        mut on_change: F,
    ) where
        F: FnMut(&T, ResetEvent),
    {
        let animated = animated && self.clock.duration_ms() > 0.0;
        if animated && self.compare_contents(&items) {
            self.replace_in_place(items);
            self.clock.cancel();
            self.prepare_all();
            self.measure_impl(true);
            self.start_if_changed();
            return;
        }

        tracing::debug!(
            previous = self.len(),
            next = items.len(),
            animated,
            "list reset"
        );

        if !animated {
            let before = self.bounds();
            self.clock.cancel();
            let mut previous: FxHashMap<T::Identity, Entry<T>> = self
                .entries
                .drain(..)
                .map(|e| (e.item.identity(), e))
                .collect();
            for (index, mut item) in items.into_iter().enumerate() {
                match previous.remove(&item.identity()) {
                    Some(old) => {
                        item.carry_over(&old.item);
                        if old.removing {
                            on_change(&item, ResetEvent::Added { returned: true });
                        }
                    }
                    None => on_change(&item, ResetEvent::Added { returned: false }),
                }
                item.apply_changes();
                self.entries.push(Entry::new(item, index, true));
            }
            for old in previous.values().filter(|e| !e.removing) {
                on_change(&old.item, ResetEvent::Removed);
            }
            self.measure_impl(false);
            self.notify_static(before);
            return;
        }

        self.clock.cancel();
        self.prepare_all();

        let mut slots: Vec<Option<T>> = items.into_iter().map(Some).collect();
        for entry in &mut self.entries {
            match positions.get(&entry.item.identity()) {
                Some(&index) => {
                    if let Some(mut item) = slots[index].take() {
                        item.carry_over(&entry.item);
                        entry.item = item;
                    }
                    entry.index = index;
                    entry.position.set_to(index as f32);
                    if entry.removing {
                        entry.removing = false;
                        entry.visibility.set_to(1.0);
                        on_change(&entry.item, ResetEvent::Added { returned: true });
                    }
                }
                None => {
                    if !entry.removing {
                        entry.removing = true;
                        entry.visibility.set_to(0.0);
                        on_change(&entry.item, ResetEvent::Removed);
                    }
                }
            }
        }
        for (index, slot) in slots.into_iter().enumerate() {
            if let Some(item) = slot {
                on_change(&item, ResetEvent::Added { returned: false });
                let mut entry = Entry::new(item, index, false);
                entry.visibility.set_to(1.0);
                self.entries.push(entry);
            }
        }
        // Stable: a leaving entry stays ahead of the item that took its index
        self.entries.sort_by_key(|e| e.index);

        self.measure_impl(true);
        self.start_if_changed();
    }

    fn replace_in_place(&mut self, items: Vec<T>) {
        let mut incoming = items.into_iter();
        for entry in self.entries.iter_mut().filter(|e| !e.removing) {
            if let Some(mut item) = incoming.next() {
                item.carry_over(&entry.item);
                entry.item = item;
            }
        }
    }

    fn measure_impl(&mut self, animated: bool) {
        let actual: Vec<&T> = self
            .entries
            .iter()
            .filter(|e| !e.removing)
            .map(|e| &e.item)
            .collect();
        let count = actual.len();
        let arrangement = self.layout.arrange(&actual);

        let mut rects = arrangement.rects.into_iter();
        for entry in self.entries.iter_mut().filter(|e| !e.removing) {
            let target = rects.next().unwrap_or_default();
            if animated && entry.visibility.get() > 0.0 {
                entry.rect.set_to(target);
            } else {
                entry.rect.set(target);
            }
        }
        self.metadata
            .set_targets(&arrangement.summary, count, animated);
    }

    fn prepare_all(&mut self) {
        for entry in &mut self.entries {
            entry.prepare();
        }
        self.metadata.prepare();
    }

    fn has_changes(&self) -> bool {
        self.metadata.has_changes() || self.entries.iter().any(Entry::has_changes)
    }

    /// Start the clock for pending changes and tell the observer a frame is
    /// due. Geometry is reported against the bounds the animation ends at.
    fn start_if_changed(&mut self) {
        if self.has_changes() {
            self.clock.start();
            if !self.clock.is_running() {
                self.apply_animation(1.0);
                return;
            }
            let target = (
                self.metadata.target_total_width(),
                self.metadata.target_total_height(),
            );
            self.notify(target != self.bounds(), true);
        } else if self.remove_junk() {
            self.notify(false, true);
        }
    }

    fn remove_junk(&mut self) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| !e.removing);
        before != self.entries.len()
    }

    fn bounds(&self) -> (f32, f32) {
        (self.metadata.total_width(), self.metadata.total_height())
    }

    fn notify_static(&self, before: (f32, f32)) {
        self.notify(before != self.bounds(), true);
    }

    fn notify(&self, bounds_changed: bool, repaint: bool) {
        if bounds_changed {
            self.observer.on_geometry_changed();
        } else if repaint {
            self.observer.on_repaint_needed();
        }
    }
}

impl<T: ListItem + fmt::Debug, L: ListLayout + fmt::Debug> fmt::Debug for ListDiffAnimator<T, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListDiffAnimator")
            .field("entries", &self.entries)
            .field("metadata", &self.metadata)
            .field("layout", &self.layout)
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

/// Map every identity to its index, rejecting duplicates
fn index_identities<T: ListItem>(items: &[T]) -> Result<FxHashMap<T::Identity, usize>> {
    let mut positions = FxHashMap::default();
    positions.reserve(items.len());
    for (index, item) in items.iter().enumerate() {
        if let Some(&first) = positions.get(&item.identity()) {
            return Err(LayoutError::DuplicateIdentity { index, first });
        }
        positions.insert(item.identity(), index);
    }
    Ok(positions)
}
