//! Scenario replay
//!
//! A scenario is a TOML document that drives one [`MessageBubble`] through a
//! sequence of steps. Every tick produces a [`Frame`] describing the bubble
//! as a renderer would draw it at that moment.
//!
//! ```toml
//! frame_ms = 16.0
//! max_content_width = 280.0
//!
//! [[steps]]
//! action = "content"
//! animated = false
//! block = { id = 1, width = 180.0, height = 40.0, last_line_width = 120.0 }
//!
//! [[steps]]
//! action = "reactions"
//! reactions = [{ key = "👍", total_count = 2, recent_senders = [1, 2] }]
//!
//! [[steps]]
//! action = "settle"
//! ```

use anyhow::{ensure, Result};
use bubbl_core::{CountingObserver, Point, Rect, Size};
use bubbl_layout::{
    BottomLineWidth, BubbleShape, ContentBlock, LayoutConfig, MessageBubble, MonospaceMeasurer,
    ReactionSnapshot,
};
use serde::{Deserialize, Serialize};
use std::rc::Rc;

/// Upper bound on frames recorded by one `tick` or `settle` step
const MAX_STEP_FRAMES: usize = 10_000;

fn default_frame_ms() -> f32 {
    16.0
}

fn default_max_width() -> f32 {
    320.0
}

fn default_true() -> bool {
    true
}

// =============================================================================
// Scenario document
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    /// Frame interval used by `tick` and `settle`
    #[serde(default = "default_frame_ms")]
    pub frame_ms: f32,
    /// Initial maximum content width
    #[serde(default = "default_max_width")]
    pub max_content_width: f32,
    /// Initial size of the time indicator
    #[serde(default)]
    pub time: Size,
    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    /// Replace the content; no block clears it
    Content {
        #[serde(default)]
        block: Option<ContentBlock>,
        #[serde(default = "default_true")]
        animated: bool,
    },
    Reactions {
        #[serde(default)]
        reactions: Vec<ReactionSnapshot>,
        #[serde(default = "default_true")]
        animated: bool,
    },
    /// Merge flags from the surrounding list
    Merge {
        #[serde(default)]
        above: bool,
        #[serde(default)]
        below: bool,
    },
    Width {
        max_width: f32,
        #[serde(default = "default_true")]
        animated: bool,
    },
    Time {
        width: f32,
        height: f32,
        #[serde(default = "default_true")]
        animated: bool,
    },
    /// Advance by `ms`, one frame at a time
    Tick { ms: f32 },
    /// Advance until every animation has finished
    Settle,
    /// Jump every animation to its end
    Stop,
    /// Record a frame without advancing
    Snapshot,
}

impl Scenario {
    pub fn parse(content: &str) -> Result<Self> {
        let scenario: Scenario = toml::from_str(content)?;
        ensure!(
            scenario.frame_ms.is_finite() && scenario.frame_ms > 0.0,
            "frame_ms must be positive, got {}",
            scenario.frame_ms
        );
        for step in &scenario.steps {
            if let Step::Tick { ms } = step {
                ensure!(ms.is_finite() && *ms >= 0.0, "tick ms must be non-negative, got {}", ms);
            }
        }
        Ok(scenario)
    }
}

// =============================================================================
// Frames
// =============================================================================

/// Bubble state after one frame
#[derive(Debug, Clone, Serialize)]
pub struct Frame {
    pub time_ms: f32,
    pub animating: bool,
    /// Observer notifications since the previous frame
    pub geometry_changes: usize,
    pub repaints: usize,
    pub shape: BubbleShape,
    pub bottom_line: BottomLineWidth,
    pub content: Vec<ContentFrame>,
    pub reactions: Vec<ChipFrame>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContentFrame {
    pub id: u64,
    pub rect: Rect,
    pub visibility: f32,
    pub removing: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChipFrame {
    pub key: String,
    pub rect: Rect,
    pub visibility: f32,
    pub chosen: f32,
    pub removing: bool,
}

// =============================================================================
// Replay
// =============================================================================

/// Runs a scenario against a fresh bubble
pub struct Replay {
    bubble: MessageBubble,
    observer: Rc<CountingObserver>,
    frame_ms: f32,
    time_ms: f32,
    frames: Vec<Frame>,
}

impl Replay {
    pub fn new(config: &LayoutConfig, scenario: &Scenario) -> Self {
        let observer = CountingObserver::new();
        let mut bubble = MessageBubble::new(
            config,
            observer.clone(),
            Box::new(MonospaceMeasurer::default()),
        );
        bubble.set_max_content_width(scenario.max_content_width, false);
        bubble.set_time_size(scenario.time, false);
        Self {
            bubble,
            observer,
            frame_ms: scenario.frame_ms,
            time_ms: 0.0,
            frames: Vec::new(),
        }
    }

    /// Run every step and return the recorded frames
    pub fn run(mut self, steps: &[Step]) -> Vec<Frame> {
        for step in steps {
            self.step(step);
        }
        self.frames
    }

    fn step(&mut self, step: &Step) {
        tracing::debug!(?step, time_ms = self.time_ms, "replay step");
        match step {
            Step::Content { block, animated } => self.bubble.set_content(block.clone(), *animated),
            Step::Reactions {
                reactions,
                animated,
            } => self.bubble.set_reactions(reactions, *animated),
            Step::Merge { above, below } => self.bubble.set_merged(*above, *below),
            Step::Width {
                max_width,
                animated,
            } => self.bubble.set_max_content_width(*max_width, *animated),
            Step::Time {
                width,
                height,
                animated,
            } => self
                .bubble
                .set_time_size(Size::new(*width, *height), *animated),
            Step::Tick { ms } => {
                let frames = tick_frames(*ms, self.frame_ms);
                for _ in 0..frames {
                    self.advance();
                }
            }
            Step::Settle => {
                let mut frames = 0;
                while self.bubble.is_animating() {
                    if frames == MAX_STEP_FRAMES {
                        tracing::warn!("Animation did not settle after {} frames", frames);
                        break;
                    }
                    self.advance();
                    frames += 1;
                }
            }
            Step::Stop => self.bubble.stop_animation(),
            Step::Snapshot => self.record(),
        }
    }

    fn advance(&mut self) {
        self.bubble.tick(self.frame_ms);
        self.time_ms += self.frame_ms;
        self.record();
    }

    fn record(&mut self) {
        let (geometry_changes, repaints) = self.observer.take();
        let content = self
            .bubble
            .entries()
            .map(|entry| ContentFrame {
                id: entry.item().id,
                rect: entry.rect(),
                visibility: entry.visibility(),
                removing: entry.is_removing(),
            })
            .collect();
        let reactions = self
            .bubble
            .reactions()
            .entries()
            .map(|entry| ChipFrame {
                key: entry.item().key().to_string(),
                rect: entry.rect(),
                visibility: entry.visibility(),
                chosen: entry.item().chosen_factor(),
                removing: entry.is_removing(),
            })
            .collect();

        self.frames.push(Frame {
            time_ms: self.time_ms,
            animating: self.bubble.is_animating(),
            geometry_changes,
            repaints,
            shape: self.bubble.bubble_shape(Point::ZERO),
            bottom_line: self.bubble.bottom_line_width(),
            content,
            reactions,
        });
    }
}

/// Whole frames covering `ms`, capped at [`MAX_STEP_FRAMES`]
fn tick_frames(ms: f32, frame_ms: f32) -> usize {
    let frames = (ms / frame_ms).ceil();
    if frames > MAX_STEP_FRAMES as f32 {
        tracing::warn!("Tick of {} ms capped at {} frames", ms, MAX_STEP_FRAMES);
        return MAX_STEP_FRAMES;
    }
    frames as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASIC: &str = r#"
        frame_ms = 20.0
        max_content_width = 240.0

        [[steps]]
        action = "content"
        animated = false
        block = { id = 1, width = 180.0, height = 40.0, last_line_width = 120.0 }

        [[steps]]
        action = "snapshot"

        [[steps]]
        action = "content"
        block = { id = 2, width = 200.0, height = 60.0 }

        [[steps]]
        action = "settle"
    "#;

    fn replay(text: &str) -> Vec<Frame> {
        let scenario = Scenario::parse(text).unwrap();
        Replay::new(&LayoutConfig::default(), &scenario).run(&scenario.steps)
    }

    #[test]
    fn test_parse_steps() {
        let scenario = Scenario::parse(BASIC).unwrap();
        assert_eq!(scenario.frame_ms, 20.0);
        assert_eq!(scenario.steps.len(), 4);
        assert!(matches!(scenario.steps[1], Step::Snapshot));
        match &scenario.steps[2] {
            Step::Content { block, animated } => {
                assert!(*animated);
                assert_eq!(block.as_ref().map(|b| b.id), Some(2));
                assert_eq!(block.as_ref().and_then(|b| b.last_line_width), None);
            }
            other => panic!("unexpected step {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_bad_frame_interval() {
        assert!(Scenario::parse("frame_ms = 0.0").is_err());
        assert!(Scenario::parse("[[steps]]\naction = \"tick\"\nms = -5.0\n").is_err());
        assert!(Scenario::parse("[[steps]]\naction = \"jump\"\n").is_err());
    }

    #[test]
    fn test_replace_settles() {
        let frames = replay(BASIC);
        let first = &frames[0];
        assert_eq!(first.time_ms, 0.0);
        assert_eq!(first.content.len(), 1);
        assert_eq!(first.content[0].visibility, 1.0);

        let last = frames.last().unwrap();
        assert!(!last.animating);
        assert_eq!(last.content.len(), 1);
        assert_eq!(last.content[0].id, 2);
        assert_eq!(last.content[0].visibility, 1.0);
        assert_eq!(last.bottom_line, BottomLineWidth::Expand);

        // Block 1 fades out while block 2 fades in
        let mid = &frames[2];
        assert!(mid.animating);
        assert_eq!(mid.content.len(), 2);
        assert!(mid.content.iter().any(|c| c.id == 1 && c.removing));
    }

    #[test]
    fn test_tick_rounds_up_to_whole_frames() {
        let frames = replay(
            r#"
            frame_ms = 16.0
            [[steps]]
            action = "tick"
            ms = 40.0
            "#,
        );
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[2].time_ms, 48.0);
        assert!(frames.iter().all(|f| !f.animating && f.content.is_empty()));
    }

    #[test]
    fn test_tick_frames_capped() {
        assert_eq!(tick_frames(40.0, 16.0), 3);
        assert_eq!(tick_frames(0.0, 16.0), 0);
        assert_eq!(tick_frames(1e30, 16.0), MAX_STEP_FRAMES);
        assert_eq!(tick_frames(f32::MAX, 0.001), MAX_STEP_FRAMES);
    }

    #[test]
    fn test_huge_tick_is_bounded() {
        let frames = replay(
            r#"
            frame_ms = 16.0
            [[steps]]
            action = "tick"
            ms = 1e30
            "#,
        );
        assert_eq!(frames.len(), MAX_STEP_FRAMES);
    }

    #[test]
    fn test_reactions_and_merge() {
        let frames = replay(
            r#"
            [[steps]]
            action = "content"
            animated = false
            block = { id = 7, width = 150.0, height = 20.0, last_line_width = 150.0 }

            [[steps]]
            action = "merge"
            above = true

            [[steps]]
            action = "reactions"
            reactions = [
                { key = "👍", total_count = 2, chosen = true, recent_senders = [1, 2] },
                { key = "❤️", total_count = 12 },
            ]

            [[steps]]
            action = "settle"
            "#,
        );
        let last = frames.last().unwrap();
        assert_eq!(last.reactions.len(), 2);
        assert_eq!(last.reactions[0].key, "👍");
        assert_eq!(last.reactions[0].chosen, 1.0);
        assert_eq!(last.reactions[1].chosen, 0.0);
        assert!(last.reactions.iter().all(|c| c.visibility == 1.0));
        assert_eq!(last.shape.radii.top_left, 0.0);
        assert_eq!(last.shape.radii.top_right, 0.0);
        assert!(last.shape.radii.bottom_left > 0.0);

        let notified: usize = frames.iter().map(|f| f.geometry_changes + f.repaints).sum();
        assert!(notified > 0);
    }

    #[test]
    fn test_stop_jumps_to_end() {
        let frames = replay(
            r#"
            [[steps]]
            action = "content"
            block = { id = 1, width = 100.0, height = 20.0 }

            [[steps]]
            action = "stop"

            [[steps]]
            action = "snapshot"
            "#,
        );
        assert_eq!(frames.len(), 1);
        assert!(!frames[0].animating);
        assert_eq!(frames[0].content[0].visibility, 1.0);
    }
}
