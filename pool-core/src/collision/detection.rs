//! Geometric collision predicates.
//!
//! All predicates are pure: they inspect ball and table state and report what
//! was hit. Velocity changes are applied by the frame loop, never here.

use crate::types::{BallSet, Table, Vec2, BALL_COUNT};

/// Configuration for collision detection.
#[derive(Debug, Clone)]
pub struct CollisionConfig {
    /// Positional slack of the cushion-proximity test, in meters.
    ///
    /// A cushion contact triggers while the ball surface is within this
    /// distance of the edge, so slow balls cannot creep past the cushion
    /// between frames.
    pub slack: f64,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self { slack: 0.01 }
    }
}

/// Per-axis result of the cushion-proximity test.
///
/// The table edges are axis-aligned, so a contact on the left/right cushion
/// reflects the X velocity component and a contact on the top/bottom cushion
/// reflects the Y component. A corner contact reports both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BorderContact {
    pub x: bool,
    pub y: bool,
}

impl BorderContact {
    pub fn any(&self) -> bool {
        self.x || self.y
    }
}

/// Collision detector for the billiards table.
#[derive(Debug, Default)]
pub struct CollisionDetector {
    pub config: CollisionConfig,
}

impl CollisionDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: CollisionConfig) -> Self {
        Self { config }
    }

    /// Find the ball the subject will collide with this frame.
    ///
    /// Considers every *other active* ball whose current position lies
    /// strictly within one ball diameter of the subject's predicted end
    /// position, and picks the one closest to the subject's *current*
    /// position (the first such ball wins on a tie).
    ///
    /// Returns `subject` itself when no ball qualifies, meaning no ball-ball
    /// collision this frame.
    pub fn closest_ball(
        &self,
        table: &Table,
        balls: &BallSet,
        end_position: Vec2,
        subject: usize,
    ) -> usize {
        let diameter = 2.0 * table.ball_radius;
        let mut index = subject;
        let mut distance = f64::INFINITY;

        for i in 0..BALL_COUNT {
            if i == subject || !balls.is_active(i) {
                continue;
            }
            if (end_position - balls.position(i)).magnitude() < diameter {
                let current = (balls.position(subject) - balls.position(i)).magnitude();
                if current < distance {
                    distance = current;
                    index = i;
                }
            }
        }
        index
    }

    /// Cushion-proximity test for a predicted ball position.
    ///
    /// An axis reports contact when the position's distance to that axis's
    /// nearest edge is within `ball_radius + slack`.
    pub fn border_contact(&self, table: &Table, position: Vec2) -> BorderContact {
        let reach = table.ball_radius + self.config.slack;
        BorderContact {
            x: (position.x.abs() - table.half_width()).abs() <= reach,
            y: (position.y.abs() - table.half_height()).abs() <= reach,
        }
    }

    /// Index of the pocket that captures a ball at `position`, if any.
    ///
    /// A ball is captured when its center is within the capture radius of a
    /// pocket center; a distance exactly equal to the threshold counts.
    pub fn pocket_at(&self, table: &Table, position: Vec2) -> Option<usize> {
        table
            .pocket_positions()
            .iter()
            .position(|pocket| (position - *pocket).magnitude() <= table.capture_radius())
    }
}

// =============================================================================
// Tests
// =============================================================================
