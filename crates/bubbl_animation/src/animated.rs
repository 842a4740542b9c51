//! Two-phase animated value
//!
//! An [`AnimatedValue`] keeps the value currently on screen plus an explicit
//! phase describing where it is heading:
//!
//! ```text
//! Idle ──set_to──▶ Pending{origin, target} ──apply──▶ Animating{.., progress}
//!   ▲                                                         │
//!   └────────────────────────── finish ◀──────────────────────┘
//! ```
//!
//! The owner decides whether a pending change animates (repeated `apply`
//! calls with an external factor) or snaps (`finish`). Easing is applied by
//! whoever produces the factor, usually a [`FactorClock`](crate::FactorClock).

use crate::values::{Interpolate, DEFAULT_EPSILON};

/// Where an [`AnimatedValue`] is in its animation cycle
#[derive(Clone, Debug, PartialEq)]
pub enum Phase<T> {
    /// Settled, `current` is final
    Idle,
    /// A target is stored but no frame has been applied yet
    Pending { origin: T, target: T },
    /// Interpolating from `origin` to `target`
    Animating { origin: T, target: T, progress: f32 },
}

/// A value with a current state and an optional pending/animating target
#[derive(Clone, Debug)]
pub struct AnimatedValue<T: Interpolate> {
    current: T,
    phase: Phase<T>,
    epsilon: f32,
}

impl<T: Interpolate + Default> Default for AnimatedValue<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Interpolate> AnimatedValue<T> {
    /// Create a settled value
    pub fn new(value: T) -> Self {
        Self {
            current: value,
            phase: Phase::Idle,
            epsilon: DEFAULT_EPSILON,
        }
    }

    /// Epsilon used by [`differs`](Self::differs) and change detection
    pub fn with_epsilon(mut self, epsilon: f32) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// The value to render right now
    pub fn value(&self) -> &T {
        &self.current
    }

    /// The value this animated value will settle on
    pub fn target(&self) -> &T {
        match &self.phase {
            Phase::Idle => &self.current,
            Phase::Pending { target, .. } | Phase::Animating { target, .. } => target,
        }
    }

    /// The value the running cycle started from
    pub fn origin(&self) -> &T {
        match &self.phase {
            Phase::Idle => &self.current,
            Phase::Pending { origin, .. } | Phase::Animating { origin, .. } => origin,
        }
    }

    pub fn phase(&self) -> &Phase<T> {
        &self.phase
    }

    /// True while a target is pending or being animated towards
    pub fn has_changes(&self) -> bool {
        !matches!(self.phase, Phase::Idle)
    }

    /// Force the value, dropping any pending or running cycle
    pub fn set(&mut self, value: T) {
        self.current = value;
        self.phase = Phase::Idle;
    }

    /// Store an eventual target without interpolating.
    ///
    /// The origin is taken from the current (possibly mid-flight) value.
    /// Returns `false` when the target is already the one in effect.
    pub fn set_to(&mut self, target: T) -> bool {
        if !self.differs(&target) {
            return false;
        }
        if matches!(self.phase, Phase::Idle) && self.current.approx_eq(&target, self.epsilon) {
            return false;
        }
        self.phase = Phase::Pending {
            origin: self.current.clone(),
            target,
        };
        true
    }

    /// Whether `candidate` differs from the current target
    pub fn differs(&self, candidate: &T) -> bool {
        !self.target().approx_eq(candidate, self.epsilon)
    }

    /// Re-snapshot the origin from the current value, keeping the target.
    ///
    /// Called before a new cycle starts so that an interrupted animation
    /// continues from where it is on screen.
    pub fn prepare(&mut self) {
        let target = match &self.phase {
            Phase::Idle => return,
            Phase::Pending { target, .. } | Phase::Animating { target, .. } => target.clone(),
        };
        self.phase = Phase::Pending {
            origin: self.current.clone(),
            target,
        };
    }

    /// Interpolate towards the target.
    ///
    /// `factor >= 1.0` assigns the target exactly and `factor <= 0.0` the
    /// origin exactly. Returns whether the visible value changed.
    pub fn apply(&mut self, factor: f32) -> bool {
        let (origin, target) = match &self.phase {
            Phase::Idle => return false,
            Phase::Pending { origin, target } | Phase::Animating { origin, target, .. } => {
                (origin.clone(), target.clone())
            }
        };
        let next = if factor >= 1.0 {
            target.clone()
        } else if factor <= 0.0 || factor.is_nan() {
            origin.clone()
        } else {
            origin.lerp(&target, factor)
        };
        let changed = !self.current.approx_eq(&next, f32::EPSILON);
        self.current = next;
        self.phase = Phase::Animating {
            origin,
            target,
            progress: factor.clamp(0.0, 1.0),
        };
        changed
    }

    /// End the cycle, snapping to the target (`apply_future`) or back to the
    /// origin. Returns whether the visible value changed.
    pub fn finish(&mut self, apply_future: bool) -> bool {
        let phase = std::mem::replace(&mut self.phase, Phase::Idle);
        let next = match phase {
            Phase::Idle => return false,
            Phase::Pending { origin, target } | Phase::Animating { origin, target, .. } => {
                if apply_future {
                    target
                } else {
                    origin
                }
            }
        };
        let changed = !self.current.approx_eq(&next, f32::EPSILON);
        self.current = next;
        changed
    }
}

impl AnimatedValue<f32> {
    /// Copy of the current scalar
    pub fn get(&self) -> f32 {
        self.current
    }

    /// Copy of the scalar target
    pub fn get_target(&self) -> f32 {
        *self.target()
    }
}
