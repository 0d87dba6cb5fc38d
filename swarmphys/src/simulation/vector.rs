//! 2D vector primitive shared by every part of the physics core
//!
//! `NVec2` is a plain nalgebra vector, so add / sub / scale / negate /
//! `norm` / `norm_squared` come for free. The helpers here cover the few
//! operations the force model needs on top of that.

use nalgebra::Vector2;

pub type NVec2 = Vector2<f32>;

/// Rescale `v` to length `len`, keeping its direction
/// A zero vector has no direction and is returned unchanged
pub fn with_length(v: NVec2, len: f32) -> NVec2 {
    let n = v.norm();
    if n > 0.0 {
        v * (len / n)
    } else {
        v
    }
}

/// Rotate `v` by +90 degrees: (x, y) -> (-y, x)
pub fn rotate_quarter_turn(v: NVec2) -> NVec2 {
    NVec2::new(-v.y, v.x)
}

/// Component-wise clamp of `v` into the box `[min, max]`
pub fn clamp_to(v: NVec2, min: NVec2, max: NVec2) -> NVec2 {
    NVec2::new(v.x.clamp(min.x, max.x), v.y.clamp(min.y, max.y))
}
