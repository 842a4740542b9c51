//! Animatable value types
//!
//! Provides the interpolation trait used by [`AnimatedValue`](crate::AnimatedValue)
//! and implementations for scalars and the geometry types of `bubbl_core`.

use bubbl_core::{lerp, CornerRadius, Point, Rect, Size};

/// Default epsilon used when deciding whether a target actually changed
pub const DEFAULT_EPSILON: f32 = 0.001;

/// Trait for values that can be linearly interpolated
///
/// Implementations must return `self` exactly for `t <= 0.0` and `other`
/// exactly for `t >= 1.0`.
pub trait Interpolate: Clone {
    /// Linearly interpolate between self and other by factor t (0.0 to 1.0)
    fn lerp(&self, other: &Self, t: f32) -> Self;

    /// Check if two values are approximately equal
    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool;
}

// ============================================================================
// Scalar Implementations
// ============================================================================

impl Interpolate for f32 {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        lerp(*self, *other, t)
    }

    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        if self.is_nan() || other.is_nan() {
            return self.is_nan() && other.is_nan();
        }
        (self - other).abs() < epsilon
    }
}

/// Booleans flip at the end of the transition
impl Interpolate for bool {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        if t >= 1.0 {
            *other
        } else {
            *self
        }
    }

    fn approx_eq(&self, other: &Self, _epsilon: f32) -> bool {
        self == other
    }
}

// ============================================================================
// Geometry Implementations
// ============================================================================

impl Interpolate for Point {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        Point::new(lerp(self.x, other.x, t), lerp(self.y, other.y, t))
    }

    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.x.approx_eq(&other.x, epsilon) && self.y.approx_eq(&other.y, epsilon)
    }
}

impl Interpolate for Size {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        Size::new(
            lerp(self.width, other.width, t),
            lerp(self.height, other.height, t),
        )
    }

    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.width.approx_eq(&other.width, epsilon)
            && self.height.approx_eq(&other.height, epsilon)
    }
}

impl Interpolate for Rect {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        Rect {
            origin: self.origin.lerp(&other.origin, t),
            size: self.size.lerp(&other.size, t),
        }
    }

    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.origin.approx_eq(&other.origin, epsilon) && self.size.approx_eq(&other.size, epsilon)
    }
}

impl Interpolate for CornerRadius {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        CornerRadius::new(
            lerp(self.top_left, other.top_left, t),
            lerp(self.top_right, other.top_right, t),
            lerp(self.bottom_right, other.bottom_right, t),
            lerp(self.bottom_left, other.bottom_left, t),
        )
    }

    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.to_array()
            .iter()
            .zip(other.to_array().iter())
            .all(|(a, b)| a.approx_eq(b, epsilon))
    }
}
