//! Collision resolution for billiard balls.
//!
//! ## Model Assumptions
//!
//! - **Equal masses**: every ball weighs the same, so an elastic contact
//!   along the line of centers reduces to *exchanging* the velocity
//!   components along that line while each ball keeps its tangential
//!   component.
//! - **Instantaneous, frictionless contact**: no deformation over time and
//!   no spin transfer.
//!
//! ```text
//!        tangential (kept)
//!            ↑
//!     ●──────┼──────→ normal (exchanged)
//!   subject  ●
//!          target
//! ```
//!
//! The contact time within a frame is approximated linearly from the current
//! separation at the current speed. This is first-order: it does not solve
//! the quadratic time-of-impact equation, so at high speed or large `dt` the
//! computed contact point drifts from the true one.

use crate::types::{constants, BallSet};

/// Collision resolver for ball-ball contacts.
pub struct CollisionResolver;

impl CollisionResolver {
    /// Exchange the velocity components along the line of centers.
    ///
    /// Decomposes both balls' velocities into a component along the unit
    /// direction from `subject` to `target` (normal) and the remainder
    /// (tangential), then swaps the normal components.
    ///
    /// The two balls must not be coincident: the contact direction is
    /// undefined otherwise.
    pub fn resolve(balls: &mut BallSet, subject: usize, target: usize) {
        let offset = balls.position(target) - balls.position(subject);
        debug_assert!(
            offset.magnitude_squared() > constants::EPSILON,
            "collision resolution between coincident balls {} and {}",
            subject,
            target
        );
        let dir = offset.normalized();

        let subject_normal = balls.velocity(subject).dot(&dir);
        let target_normal = balls.velocity(target).dot(&dir);

        let subject_tangent = balls.velocity(subject) - dir * subject_normal;
        let target_tangent = balls.velocity(target) - dir * target_normal;

        balls.set_velocity(subject, subject_tangent + dir * target_normal);
        balls.set_velocity(target, target_tangent + dir * subject_normal);
    }

    /// Time offset within the frame at which two ball centers first reach one
    /// diameter apart, assuming straight-line motion at constant speed:
    /// `(distance - 2 * ball_radius) / speed`.
    ///
    /// Negative when the balls already overlap.
    pub fn time_to_contact(distance: f64, speed: f64, ball_radius: f64) -> f64 {
        (distance - 2.0 * ball_radius) / speed
    }
}

// =============================================================================
// Tests
// =============================================================================
