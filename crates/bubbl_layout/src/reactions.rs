//! Reaction chips
//!
//! Each reaction becomes a chip whose width comes from its own content (icon
//! plus either an avatar cluster of recent senders or a counter). Chips are
//! wrapped into lines by a [`FlowLayout`] and animated by a
//! [`ListDiffAnimator`], keyed by reaction.

use bubbl_animation::{AnimatedValue, AnimationConfig};
use bubbl_core::{sanitize_extent, Point, Result, SharedObserver};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::item::ListItem;
use crate::layout::{FlowLayout, FlowSpacing};
use crate::list_animator::{Entry, ListDiffAnimator, Metadata};

/// Opaque sender identifier
pub type SenderId = i64;

/// One reaction of a message as supplied by the data layer
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionSnapshot {
    /// Emoji or custom reaction key
    pub key: String,
    pub total_count: u32,
    #[serde(default)]
    pub chosen: bool,
    #[serde(default)]
    pub recent_senders: Vec<SenderId>,
}

impl ReactionSnapshot {
    pub fn new(key: impl Into<String>, total_count: u32) -> Self {
        Self {
            key: key.into(),
            total_count,
            chosen: false,
            recent_senders: Vec::new(),
        }
    }

    pub fn chosen(mut self, chosen: bool) -> Self {
        self.chosen = chosen;
        self
    }

    pub fn with_senders(mut self, senders: impl IntoIterator<Item = SenderId>) -> Self {
        self.recent_senders = senders.into_iter().collect();
        self
    }
}

/// Merge the reactions of several messages (album members) into one list.
///
/// Counts are summed per key, a reaction is chosen if any member chose it,
/// and the result is ordered by count, descending. Ties keep first-seen
/// order.
pub fn combine<'a, I>(members: I) -> Vec<ReactionSnapshot>
where
    I: IntoIterator<Item = &'a [ReactionSnapshot]>,
{
    let mut merged: IndexMap<String, ReactionSnapshot> = IndexMap::new();
    for reactions in members {
        for reaction in reactions {
            let slot = merged
                .entry(reaction.key.clone())
                .or_insert_with(|| ReactionSnapshot::new(reaction.key.clone(), 0));
            slot.total_count = slot.total_count.saturating_add(reaction.total_count);
            slot.chosen |= reaction.chosen;
            for sender in &reaction.recent_senders {
                if !slot.recent_senders.contains(sender) {
                    slot.recent_senders.push(*sender);
                }
            }
        }
    }
    let mut combined: Vec<ReactionSnapshot> = merged.into_values().collect();
    combined.sort_by(|a, b| b.total_count.cmp(&a.total_count));
    combined
}

/// Compact counter text: `999`, `1K`, `1.5K`, `12.3K`, `2M`
pub fn format_count(count: u32) -> String {
    fn compact(value: u32, unit: u32, suffix: &str) -> String {
        let tenths = (value as u64 * 10 / unit as u64) as u32;
        if tenths % 10 == 0 || tenths >= 1000 {
            format!("{}{suffix}", tenths / 10)
        } else {
            format!("{}.{}{suffix}", tenths / 10, tenths % 10)
        }
    }
    match count {
        0..=999 => count.to_string(),
        1_000..=999_999 => compact(count, 1_000, "K"),
        _ => compact(count, 1_000_000, "M"),
    }
}

// ============================================================================
// Text measuring
// ============================================================================

/// Text metrics provider. Shaping lives outside the layout core.
pub trait TextMeasurer {
    /// Width of `text` as drawn in a chip counter
    fn measure(&self, text: &str) -> f32;
}

/// Every character has the same advance
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MonospaceMeasurer {
    pub char_width: f32,
}

impl Default for MonospaceMeasurer {
    fn default() -> Self {
        Self { char_width: 7.0 }
    }
}

impl TextMeasurer for MonospaceMeasurer {
    fn measure(&self, text: &str) -> f32 {
        text.chars().count() as f32 * self.char_width
    }
}

impl<F: Fn(&str) -> f32> TextMeasurer for F {
    fn measure(&self, text: &str) -> f32 {
        self(text)
    }
}

// ============================================================================
// Chips
// ============================================================================

/// Chip dimensions
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChipMetrics {
    pub height: f32,
    /// Inner padding on each side
    pub padding: f32,
    pub icon_size: f32,
    /// Gap between the icon and the counter or avatars
    pub icon_gap: f32,
    pub avatar_size: f32,
    /// How much each avatar overlaps the previous one
    pub avatar_overlap: f32,
    /// Senders are shown as avatars only up to this count
    pub max_avatars: usize,
    pub spacing: FlowSpacing,
}

impl Default for ChipMetrics {
    fn default() -> Self {
        Self {
            height: 28.0,
            padding: 10.0,
            icon_size: 20.0,
            icon_gap: 4.0,
            avatar_size: 20.0,
            avatar_overlap: 8.0,
            max_avatars: 3,
            spacing: FlowSpacing {
                item_spacing: 6.0,
                line_spacing: 6.0,
                max_items_in_row: 0,
            },
        }
    }
}

/// What a chip shows next to its icon
#[derive(Clone, Debug, PartialEq)]
pub enum ChipContent {
    Avatars(Vec<SenderId>),
    Counter(String),
}

/// A reaction laid out as a chip
#[derive(Clone, Debug)]
pub struct ReactionChip {
    snapshot: ReactionSnapshot,
    content: ChipContent,
    width: f32,
    height: f32,
    chosen: AnimatedValue<f32>,
}

impl ReactionChip {
    pub fn new(snapshot: ReactionSnapshot, metrics: &ChipMetrics, measurer: &dyn TextMeasurer) -> Self {
        let count = snapshot.total_count as usize;
        let content = if count > 0
            && count <= metrics.max_avatars
            && snapshot.recent_senders.len() >= count
        {
            ChipContent::Avatars(snapshot.recent_senders[..count].to_vec())
        } else {
            ChipContent::Counter(format_count(snapshot.total_count))
        };

        let content_width = match &content {
            ChipContent::Avatars(senders) => {
                let step = (metrics.avatar_size - metrics.avatar_overlap).max(0.0);
                metrics.avatar_size + step * senders.len().saturating_sub(1) as f32
            }
            ChipContent::Counter(text) => sanitize_extent(measurer.measure(text)),
        };
        let width = metrics.padding * 2.0 + metrics.icon_size + metrics.icon_gap + content_width;
        let chosen = AnimatedValue::new(if snapshot.chosen { 1.0 } else { 0.0 });

        Self {
            snapshot,
            content,
            width: sanitize_extent(width),
            height: sanitize_extent(metrics.height),
            chosen,
        }
    }

    pub fn key(&self) -> &str {
        &self.snapshot.key
    }

    pub fn snapshot(&self) -> &ReactionSnapshot {
        &self.snapshot
    }

    pub fn content(&self) -> &ChipContent {
        &self.content
    }

    /// Animated highlight, `1.0` when the reaction is chosen
    pub fn chosen_factor(&self) -> f32 {
        self.chosen.get()
    }
}

impl ListItem for ReactionChip {
    type Identity = String;

    fn identity(&self) -> Self::Identity {
        self.snapshot.key.clone()
    }

    fn width(&self) -> f32 {
        self.width
    }

    fn height(&self) -> f32 {
        self.height
    }

    fn has_changes(&self) -> bool {
        self.chosen.has_changes()
    }

    fn prepare_changes(&mut self) {
        self.chosen.prepare();
    }

    fn apply_animation(&mut self, factor: f32) -> bool {
        self.chosen.apply(factor)
    }

    fn finish_animation(&mut self, apply_future: bool) {
        self.chosen.finish(apply_future);
    }

    fn carry_over(&mut self, previous: &Self) {
        let target = self.chosen.get();
        self.chosen = previous.chosen.clone();
        self.chosen.set_to(target);
    }
}

// ============================================================================
// Layout
// ============================================================================

/// Animated, wrapped list of reaction chips
pub struct ReactionFlowLayout {
    list: ListDiffAnimator<ReactionChip, FlowLayout>,
    metrics: ChipMetrics,
    measurer: Box<dyn TextMeasurer>,
}

impl ReactionFlowLayout {
    pub fn new(
        observer: SharedObserver,
        metrics: ChipMetrics,
        config: &AnimationConfig,
        measurer: Box<dyn TextMeasurer>,
    ) -> Self {
        let layout = FlowLayout::new(metrics.spacing, f32::INFINITY);
        Self {
            list: ListDiffAnimator::new(layout, observer, config),
            metrics,
            measurer,
        }
    }

    /// Replace the reaction set. Reactions with a zero count are skipped.
    pub fn set_reactions(&mut self, reactions: &[ReactionSnapshot], animated: bool) -> Result<()> {
        let chips: Vec<ReactionChip> = reactions
            .iter()
            .filter(|r| r.total_count > 0)
            .map(|r| ReactionChip::new(r.clone(), &self.metrics, self.measurer.as_ref()))
            .collect();
        self.list.reset(chips, animated)
    }

    /// Width available for wrapping
    pub fn set_max_width(&mut self, max_width: f32, animated: bool) {
        if self.list.layout().max_width != max_width {
            self.list.layout_mut().max_width = max_width;
            self.list.measure(animated);
        }
    }

    /// Width of the trailing time indicator that should follow the last chip
    pub fn set_trailing(&mut self, trailing_width: f32, force_expand: bool, animated: bool) {
        let layout = self.list.layout();
        if layout.trailing_width != trailing_width || layout.force_expand != force_expand {
            let layout = self.list.layout_mut();
            layout.trailing_width = trailing_width;
            layout.force_expand = force_expand;
            self.list.measure(animated);
        }
    }

    /// Chip under a point, in layout coordinates. Leaving chips are ignored.
    pub fn chip_at(&self, x: f32, y: f32) -> Option<&ReactionChip> {
        let point = Point::new(x, y);
        self.list
            .entries()
            .filter(|e| !e.is_removing() && e.visibility() > 0.0)
            .find(|e| e.rect().contains(point))
            .map(Entry::item)
    }

    pub fn get(&self, key: &str) -> Option<&ReactionChip> {
        self.list.get(&key.to_owned())
    }

    pub fn entries(&self) -> std::slice::Iter<'_, Entry<ReactionChip>> {
        self.list.entries()
    }

    pub fn metadata(&self) -> &Metadata {
        self.list.metadata()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn tick(&mut self, dt_ms: f32) -> bool {
        self.list.tick(dt_ms)
    }

    pub fn stop_animation(&mut self) {
        self.list.stop_animation();
    }

    pub fn is_animating(&self) -> bool {
        self.list.is_animating()
    }

    pub fn clear(&mut self, animated: bool) {
        self.list.clear(animated);
    }
}
