//! Animation tunables

use serde::{Deserialize, Serialize};

use crate::easing::Easing;

/// Default duration of list and bubble transitions
pub const DEFAULT_DURATION_MS: f32 = 180.0;

/// Duration and curve shared by every animator of a message
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Transition length in milliseconds; `0` applies changes immediately
    pub duration_ms: f32,
    pub easing: Easing,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            duration_ms: DEFAULT_DURATION_MS,
            easing: Easing::Decelerate,
        }
    }
}

impl AnimationConfig {
    /// Configuration that never animates
    pub fn instant() -> Self {
        Self {
            duration_ms: 0.0,
            ..Self::default()
        }
    }
}
