//! Frame-driven animation clock
//!
//! The core never owns a timer. The platform's frame callback feeds elapsed
//! milliseconds into [`FactorClock::advance`], which turns them into an eased
//! factor in `[0, 1]`.

use crate::config::AnimationConfig;
use crate::easing::Easing;

/// Fixed-duration clock producing an eased animation factor
#[derive(Clone, Debug)]
pub struct FactorClock {
    duration_ms: f32,
    easing: Easing,
    elapsed_ms: f32,
    running: bool,
}

impl Default for FactorClock {
    fn default() -> Self {
        Self::from_config(&AnimationConfig::default())
    }
}

impl FactorClock {
    pub fn new(duration_ms: f32, easing: Easing) -> Self {
        Self {
            duration_ms: bubbl_core::sanitize_extent(duration_ms),
            easing,
            elapsed_ms: 0.0,
            running: false,
        }
    }

    pub fn from_config(config: &AnimationConfig) -> Self {
        Self::new(config.duration_ms, config.easing)
    }

    pub fn duration_ms(&self) -> f32 {
        self.duration_ms
    }

    pub fn easing(&self) -> Easing {
        self.easing
    }

    /// Zero-duration clocks complete on start
    pub fn is_instant(&self) -> bool {
        self.duration_ms <= 0.0
    }

    /// (Re)start from zero
    pub fn start(&mut self) {
        self.elapsed_ms = 0.0;
        self.running = !self.is_instant();
        tracing::trace!(duration_ms = self.duration_ms, "clock started");
    }

    /// Stop without reaching the end
    pub fn cancel(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Linear progress (0.0 to 1.0)
    pub fn progress(&self) -> f32 {
        if self.is_instant() {
            return 1.0;
        }
        (self.elapsed_ms / self.duration_ms).clamp(0.0, 1.0)
    }

    /// Eased progress
    pub fn factor(&self) -> f32 {
        self.easing.apply(self.progress())
    }

    /// Advance by `dt_ms` milliseconds.
    ///
    /// Returns the eased factor to apply this frame, or `None` when the clock
    /// is not running. The frame that reaches the end returns exactly `1.0`
    /// and stops the clock.
    pub fn advance(&mut self, dt_ms: f32) -> Option<f32> {
        if !self.running {
            return None;
        }
        if dt_ms.is_finite() && dt_ms > 0.0 {
            self.elapsed_ms += dt_ms;
        }
        if self.elapsed_ms >= self.duration_ms {
            self.elapsed_ms = self.duration_ms;
            self.running = false;
            return Some(1.0);
        }
        Some(self.factor())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_reaches_one() {
        let mut clock = FactorClock::new(100.0, Easing::Linear);
        clock.start();
        assert_eq!(clock.advance(40.0), Some(0.4));
        assert!(clock.is_running());
        assert_eq!(clock.advance(80.0), Some(1.0));
        assert!(!clock.is_running());
        assert_eq!(clock.advance(16.0), None);
    }

    #[test]
    fn test_instant_clock_never_runs() {
        let mut clock = FactorClock::new(0.0, Easing::Decelerate);
        clock.start();
        assert!(!clock.is_running());
        assert_eq!(clock.progress(), 1.0);
    }

    #[test]
    fn test_restart_resets_elapsed() {
        let mut clock = FactorClock::new(100.0, Easing::Linear);
        clock.start();
        clock.advance(70.0);
        clock.start();
        assert_eq!(clock.progress(), 0.0);
    }

    #[test]
    fn test_negative_dt_ignored() {
        let mut clock = FactorClock::new(100.0, Easing::Linear);
        clock.start();
        assert_eq!(clock.advance(-5.0), Some(0.0));
        assert_eq!(clock.advance(f32::NAN), Some(0.0));
    }
}
