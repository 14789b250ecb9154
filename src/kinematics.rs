//! Kinematics helpers shared by the ball and goalkeeper
//!
//! Pure functions, no ECS access. Each mirrors one step of the ball
//! integrator so it can be tested in isolation.

use bevy::prelude::*;
use rand::Rng;

/// Apply gravity to the vertical velocity component
pub fn integrate_gravity(velocity: Vec3, gravity: f32, dt: f32) -> Vec3 {
    Vec3::new(velocity.x, velocity.y - gravity * dt, velocity.z)
}

/// Scale horizontal (x) and forward (z) velocity by the drag factor.
/// Vertical velocity is left to gravity.
pub fn apply_drag(velocity: Vec3, drag: f32) -> Vec3 {
    Vec3::new(velocity.x * drag, velocity.y, velocity.z * drag)
}

/// Result of resolving ground contact for one step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundContact {
    pub y: f32,
    pub velocity_y: f32,
    pub bounced: bool,
}

/// Keep a sphere of `radius` above the ground plane (y = 0).
///
/// Below the plane the sphere is lifted back to rest on it. A fast enough
/// vertical velocity bounces with `restitution`; a slow one is zeroed.
pub fn ground_contact(
    y: f32,
    velocity_y: f32,
    radius: f32,
    restitution: f32,
    threshold: f32,
) -> GroundContact {
    if y >= radius {
        return GroundContact {
            y,
            velocity_y,
            bounced: false,
        };
    }

    if velocity_y.abs() > threshold {
        GroundContact {
            y: radius,
            velocity_y: -velocity_y * restitution,
            bounced: true,
        }
    } else {
        GroundContact {
            y: radius,
            velocity_y: 0.0,
            bounced: false,
        }
    }
}

/// Speed (velocity magnitude)
pub fn speed(velocity: Vec3) -> f32 {
    velocity.length()
}

/// Rolling rotation for a moving ball: axis perpendicular to the velocity in
/// the ground plane, angle proportional to distance covered.
/// Returns `None` for balls too slow (or moving straight up/down) to roll.
pub fn spin_delta(velocity: Vec3, dt: f32, factor: f32, min_speed: f32) -> Option<(Vec3, f32)> {
    let speed = speed(velocity);
    if speed <= min_speed {
        return None;
    }
    let axis = Vec3::new(-velocity.z, 0.0, velocity.x).try_normalize()?;
    Some((axis, speed * dt * factor))
}

/// Quadratic ease-out: fast start, gentle arrival
pub fn ease_out_quad(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}

/// Shrink a 2D vector to `max_len` if it is longer; shorter vectors pass through.
pub fn clamp_length(v: Vec2, max_len: f32) -> Vec2 {
    let len = v.length();
    if len > max_len && len > 0.0 {
        v / len * max_len
    } else {
        v
    }
}

/// Uniform sample in [-1, 1)
pub fn signed_unit(rng: &mut impl Rng) -> f32 {
    rng.gen_range(-1.0..1.0)
}

/// Uniform sample in [0, 1)
pub fn unit(rng: &mut impl Rng) -> f32 {
    rng.gen_range(0.0..1.0)
}
