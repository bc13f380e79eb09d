//! Core types for the billiards simulation.
//!
//! All units are SI:
//! - Position: meters (m)
//! - Velocity: meters per second (m/s)
//! - Time: seconds (s)
//!
//! The table lies in the XY plane, centered at the origin:
//! - X: along the long side (positive to the right)
//! - Y: along the short side (positive upward)

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub, SubAssign};

/// Number of balls in a rack, cue ball included.
pub const BALL_COUNT: usize = 7;

/// Number of pockets on the table.
pub const POCKET_COUNT: usize = 6;

/// Slot index of the cue ball, the only ball the shot controller drives.
pub const CUE_BALL: usize = 0;

// =============================================================================
// Vec2 - 2D Vector
// =============================================================================

/// A 2D vector used for positions, velocities, and directions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared magnitude (avoids sqrt for comparisons)
    pub fn magnitude_squared(&self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    /// Magnitude (length) of the vector
    pub fn magnitude(&self) -> f64 {
        self.magnitude_squared().sqrt()
    }

    /// Returns a unit vector in the same direction, or zero if magnitude is zero
    pub fn normalized(&self) -> Self {
        let mag = self.magnitude();
        if mag < constants::EPSILON {
            Self::ZERO
        } else {
            *self / mag
        }
    }

    /// Dot product
    pub fn dot(&self, other: &Self) -> f64 {
        self.x * other.x + self.y * other.y
    }
}

// Operator overloads for Vec2
impl Add for Vec2 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
    }
}

impl Sub for Vec2 {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl SubAssign for Vec2 {
    fn sub_assign(&mut self, other: Self) {
        self.x -= other.x;
        self.y -= other.y;
    }
}

impl Mul<f64> for Vec2 {
    type Output = Self;
    fn mul(self, scalar: f64) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
        }
    }
}

impl Mul<Vec2> for f64 {
    type Output = Vec2;
    fn mul(self, vec: Vec2) -> Vec2 {
        vec * self
    }
}

impl MulAssign<f64> for Vec2 {
    fn mul_assign(&mut self, scalar: f64) {
        self.x *= scalar;
        self.y *= scalar;
    }
}

impl SubAssign<f64> for Vec2 {
    fn sub_assign(&mut self, scalar: f64) {
        self.x -= scalar;
        self.y -= scalar;
    }
}

impl Div<f64> for Vec2 {
    type Output = Self;
    fn div(self, scalar: f64) -> Self {
        Self {
            x: self.x / scalar,
            y: self.y / scalar,
        }
    }
}

impl Neg for Vec2 {
    type Output = Self;
    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
        }
    }
}

impl Default for Vec2 {
    fn default() -> Self {
        Self::ZERO
    }
}

// =============================================================================
// Ball Storage
// =============================================================================

/// Whether a ball is still on the table.
///
/// A pocketed ball keeps its slot in the set but is inert: zero velocity,
/// skipped by every proximity test, never moved again until the next rack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BallStatus {
    Active,
    Pocketed,
}

/// Positions, velocities and statuses of all balls, stored as parallel
/// fixed-size arrays indexed by ball id.
///
/// Slots never move, so the ball id is a stable identity across frames.
#[derive(Debug, Clone, PartialEq)]
pub struct BallSet {
    positions: [Vec2; BALL_COUNT],
    velocities: [Vec2; BALL_COUNT],
    statuses: [BallStatus; BALL_COUNT],
}

impl BallSet {
    /// All balls placed at the table's rack layout, at rest.
    pub fn racked(table: &Table) -> Self {
        Self {
            positions: table.rack_positions(),
            velocities: [Vec2::ZERO; BALL_COUNT],
            statuses: [BallStatus::Active; BALL_COUNT],
        }
    }

    pub fn position(&self, ball: usize) -> Vec2 {
        self.positions[ball]
    }

    pub fn velocity(&self, ball: usize) -> Vec2 {
        self.velocities[ball]
    }

    pub fn speed(&self, ball: usize) -> f64 {
        self.velocities[ball].magnitude()
    }

    pub fn status(&self, ball: usize) -> BallStatus {
        self.statuses[ball]
    }

    pub fn is_active(&self, ball: usize) -> bool {
        self.statuses[ball] == BallStatus::Active
    }

    pub fn set_position(&mut self, ball: usize, position: Vec2) {
        self.positions[ball] = position;
    }

    pub fn set_velocity(&mut self, ball: usize, velocity: Vec2) {
        self.velocities[ball] = velocity;
    }

    /// Mark a ball as captured: inert slot, zero velocity.
    pub fn capture(&mut self, ball: usize) {
        self.statuses[ball] = BallStatus::Pocketed;
        self.velocities[ball] = Vec2::ZERO;
    }

    /// True when every ball's speed is below `tolerance`.
    ///
    /// Pocketed balls carry zero velocity, so they never hold this up.
    pub fn all_stopped(&self, tolerance: f64) -> bool {
        self.velocities.iter().all(|v| v.magnitude() < tolerance)
    }

    /// Total translational kinetic energy, up to the (equal) ball mass factor.
    pub fn kinetic_energy(&self) -> f64 {
        self.velocities
            .iter()
            .map(|v| 0.5 * v.magnitude_squared())
            .sum()
    }
}

// =============================================================================
// Table Geometry
// =============================================================================

/// The billiard table: a rectangle centered at the origin with six pockets.
///
/// Pockets sit at the four corners and the midpoints of the two long edges.
/// All geometry is immutable for the lifetime of a rack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub width: f64,
    pub height: f64,
    pub pocket_radius: f64,
    pub ball_radius: f64,
}

impl Table {
    /// The standard table this simulation is tuned for.
    pub fn standard() -> Self {
        Self {
            width: 15.0,
            height: 8.0,
            pocket_radius: 0.4,
            ball_radius: 0.3,
        }
    }

    pub fn half_width(&self) -> f64 {
        0.5 * self.width
    }

    pub fn half_height(&self) -> f64 {
        0.5 * self.height
    }

    /// Effective pocketing threshold. Pockets pull a ball in slightly before
    /// full overlap: the capture radius extends a quarter ball radius past
    /// the pocket rim.
    pub fn capture_radius(&self) -> f64 {
        self.pocket_radius + self.ball_radius / 4.0
    }

    /// Centers of the six pockets.
    pub fn pocket_positions(&self) -> [Vec2; POCKET_COUNT] {
        let hw = self.half_width();
        let hh = self.half_height();
        [
            Vec2::new(-hw, -hh),
            Vec2::new(0.0, -hh),
            Vec2::new(hw, -hh),
            Vec2::new(-hw, hh),
            Vec2::new(0.0, hh),
            Vec2::new(hw, hh),
        ]
    }

    /// Starting layout of a rack: the cue ball on the left, six object balls
    /// in a wedge on the right.
    pub fn rack_positions(&self) -> [Vec2; BALL_COUNT] {
        let w = self.width;
        let h = self.height;
        [
            // cue ball
            Vec2::new(-0.3 * w, 0.0),
            // object balls
            Vec2::new(0.2 * w, 0.0),
            Vec2::new(0.25 * w, 0.05 * h),
            Vec2::new(0.25 * w, -0.05 * h),
            Vec2::new(0.3 * w, 0.1 * h),
            Vec2::new(0.3 * w, 0.0),
            Vec2::new(0.3 * w, -0.1 * h),
        ]
    }
}

impl Default for Table {
    fn default() -> Self {
        Self::standard()
    }
}

// =============================================================================
// Simulation Parameters
// =============================================================================

/// Tunable parameters of the simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationParams {
    /// Sliding friction coefficient between cloth and ball.
    pub friction: f64,

    /// Cue speed in m/s imparted by a fully charged shot.
    pub shot_impulse: f64,

    /// Seconds of holding the pointer for a full charge.
    pub charge_time: f64,

    /// Speed below which a ball counts as stopped; also the positional slack
    /// of the border-proximity test.
    pub rest_tolerance: f64,

    /// Target frame rate handed to the engine at init.
    pub target_fps: u32,
}

impl SimulationParams {
    pub fn standard() -> Self {
        Self {
            friction: 0.03,
            shot_impulse: 6.0,
            charge_time: 1.0,
            rest_tolerance: 0.01,
            target_fps: 60,
        }
    }
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self::standard()
    }
}

// =============================================================================
// Physical Constants
// =============================================================================

/// Physical constants used in the simulation.
pub mod constants {
    /// Gravitational acceleration (m/s²)
    pub const GRAVITY: f64 = 9.81;

    /// Small value for floating-point comparisons
    pub const EPSILON: f64 = 1e-10;
}

// =============================================================================
// Tests
// =============================================================================
