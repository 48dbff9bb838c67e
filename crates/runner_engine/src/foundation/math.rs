//! Math utilities and types
//!
//! The runner lives on a 2D plane; positions are nalgebra vectors.

pub use nalgebra::Vector2;

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// Linear interpolation between `a` and `b`, `t` clamped to `[0, 1]`
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t.clamp(0.0, 1.0)
}

/// Inverse of [`lerp`]: where `value` sits between `a` and `b`, clamped to `[0, 1]`
///
/// Returns 0 when the range is degenerate.
pub fn inverse_lerp(a: f32, b: f32, value: f32) -> f32 {
    if (b - a).abs() <= f32::EPSILON {
        0.0
    } else {
        ((value - a) / (b - a)).clamp(0.0, 1.0)
    }
}
