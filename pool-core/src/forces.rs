//! Friction deceleration acting on rolling balls.
//!
//! The cloth decelerates every moving ball by a constant sliding-friction
//! magnitude, `μ·g`, applied to each velocity axis independently and clamped
//! at zero so deceleration alone can never reverse a component's sign.

use crate::types::{constants, BallSet, Vec2, BALL_COUNT};

/// Constant-magnitude sliding friction between cloth and ball.
pub struct SlidingFriction {
    /// Friction coefficient μ.
    pub coefficient: f64,
}

impl SlidingFriction {
    pub fn new(coefficient: f64) -> Self {
        Self { coefficient }
    }

    /// Decelerate every ball once for a frame of length `dt`.
    ///
    /// Balls slower than `tolerance` count as stopped and are left untouched.
    pub fn apply(&self, balls: &mut BallSet, tolerance: f64, dt: f64) {
        let step = self.coefficient * constants::GRAVITY * dt;

        for i in 0..BALL_COUNT {
            let velocity = balls.velocity(i);
            if velocity.magnitude() < tolerance {
                continue;
            }
            balls.set_velocity(
                i,
                Vec2::new(decay(velocity.x, step), decay(velocity.y, step)),
            );
        }
    }
}

/// Move one velocity component toward zero by `step`, clamping at zero.
fn decay(component: f64, step: f64) -> f64 {
    if component >= 0.0 {
        (component - step).max(0.0)
    } else {
        (component + step).min(0.0)
    }
}

// =============================================================================
// Tests
// =============================================================================
