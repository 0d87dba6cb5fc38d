//! Frame-step integrator for swarm nodes
//!
//! Each frame is one unit of time: forces are first folded into velocities
//! during the relax phase, then velocities move positions during the update
//! phase under a [`VelocityPolicy`].

use super::states::Node;
use super::vector::{with_length, NVec2};

/// Raw speed at or above which the remapped speed saturates
pub const REMAP_CEILING: f32 = 10_000.0;
/// Largest speed the remap can produce
pub const REMAP_MAX_SPEED: f32 = 20.0;

/// How a node's velocity is limited before it moves the node
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VelocityPolicy {
    /// Map speed `s` to `s * 20 / 10000`, saturating at 20
    CapAndRemap,
    /// Cap speed at `node.max_speed`, then keep `drag` of it for the next frame
    HardCap { drag: Option<f32> },
}

/// Newton's second law, frame-step style: `v += F * m * speed_multiplier`
/// A zero force leaves the velocity untouched
pub fn apply_force_to_velocity(node: &mut Node, force: NVec2, speed_multiplier: f32) {
    if force.norm() > 0.0 {
        node.v += force * (node.m * speed_multiplier);
    }
}

/// Piecewise-linear speed remap used by [`VelocityPolicy::CapAndRemap`]
pub fn remap_speed(speed: f32) -> f32 {
    if speed > REMAP_CEILING {
        REMAP_MAX_SPEED
    } else if speed < 0.0 {
        0.0
    } else {
        speed * REMAP_MAX_SPEED / REMAP_CEILING
    }
}

/// Advance the node's position by its velocity under `policy`
/// Clamping into the frame is left to the caller
pub fn apply_velocity_to_position(node: &mut Node, policy: VelocityPolicy) {
    match policy {
        VelocityPolicy::CapAndRemap => {
            // zero velocity stays zero: with_length has no direction to keep
            node.v = with_length(node.v, remap_speed(node.v.norm()));
            node.x += node.v;
        }
        VelocityPolicy::HardCap { drag } => {
            if node.v.norm() > node.max_speed {
                node.v = with_length(node.v, node.max_speed);
            }
            node.x += node.v;
            if let Some(drag) = drag {
                node.v *= drag;
            }
        }
    }
}
