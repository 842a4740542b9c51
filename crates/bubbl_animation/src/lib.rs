//! bubbl Animation System
//!
//! Fixed-duration, single-target interpolation for the bubbl layout core.
//!
//! # Features
//!
//! - **Easing**: a small set of curves with exact endpoints
//! - **Interpolate**: linear interpolation for scalars and geometry
//! - **AnimatedValue**: `Idle | Pending | Animating` state machine with a
//!   two-phase prepare/apply/finish cycle
//! - **FactorClock**: turns externally supplied frame deltas into an eased
//!   factor

pub mod animated;
pub mod clock;
pub mod config;
pub mod easing;
pub mod values;

pub use animated::{AnimatedValue, Phase};
pub use clock::FactorClock;
pub use config::{AnimationConfig, DEFAULT_DURATION_MS};
pub use easing::Easing;
pub use values::{Interpolate, DEFAULT_EPSILON};
