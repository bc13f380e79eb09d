//! Charge-and-release shot control.
//!
//! Holding the pointer charges the shot; releasing it fires the cue ball
//! toward the release point with a speed proportional to the accumulated
//! charge. A new shot cannot be taken while the cue ball is still rolling,
//! but the charge state resets on release either way.

use crate::types::{SimulationParams, Vec2};

/// Converts a held pointer gesture into an impulse on the cue ball.
#[derive(Debug, Clone)]
pub struct ShotController {
    charging: bool,
    progress: f64,
    charge_time: f64,
    impulse: f64,
}

impl ShotController {
    pub fn new(params: &SimulationParams) -> Self {
        Self {
            charging: false,
            progress: 0.0,
            charge_time: params.charge_time,
            impulse: params.shot_impulse,
        }
    }

    pub fn is_charging(&self) -> bool {
        self.charging
    }

    /// Charge accumulated so far, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Pointer went down: start charging. Progress continues from its
    /// current value (release always zeroes it, so in practice it starts
    /// from zero).
    pub fn press(&mut self) {
        self.charging = true;
    }

    /// Advance the charge for one frame. No-op unless charging.
    pub fn advance(&mut self, dt: f64) {
        if self.charging {
            self.progress = (self.progress + dt / self.charge_time).min(1.0);
        }
    }

    /// Pointer released at `aim`: fire if the cue ball has settled.
    ///
    /// Returns the velocity to give the cue ball, or `None` when the cue
    /// ball is still moving faster than `tolerance`. Charging state and
    /// progress reset unconditionally.
    pub fn release(
        &mut self,
        aim: Vec2,
        cue_position: Vec2,
        cue_speed: f64,
        tolerance: f64,
    ) -> Option<Vec2> {
        let fired = if cue_speed < tolerance {
            let direction = (aim - cue_position).normalized();
            Some(direction * (self.impulse * self.progress))
        } else {
            None
        };

        self.charging = false;
        self.progress = 0.0;
        fired
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f64 = 1.0 / 60.0;
    const TOLERANCE: f64 = 0.01;

    fn controller() -> ShotController {
        ShotController::new(&SimulationParams::standard())
    }

    #[test]
    fn test_does_not_charge_when_not_pressed() {
        let mut shot = controller();
        shot.advance(DT);
        assert_eq!(shot.progress(), 0.0);
        assert!(!shot.is_charging());
    }

    #[test]
    fn test_charges_while_pressed() {
        let mut shot = controller();
        shot.press();
        for _ in 0..30 {
            shot.advance(DT);
        }
        assert!((shot.progress() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_charge_caps_at_one() {
        let mut shot = controller();
        shot.press();
        for _ in 0..180 {
            shot.advance(DT);
        }
        assert_eq!(shot.progress(), 1.0);
    }

    #[test]
    fn test_full_charge_fires_at_full_impulse() {
        let mut shot = controller();
        shot.press();
        for _ in 0..60 {
            shot.advance(DT);
        }

        let velocity = shot
            .release(Vec2::new(1.0, 0.0), Vec2::ZERO, 0.0, TOLERANCE)
            .expect("settled cue ball should fire");

        assert!((velocity.magnitude() - 6.0).abs() < 1e-9);
        assert!((velocity.normalized().x - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_partial_charge_scales_impulse() {
        let mut shot = controller();
        shot.press();
        for _ in 0..30 {
            shot.advance(DT);
        }

        let velocity = shot
            .release(Vec2::new(0.0, -2.0), Vec2::ZERO, 0.0, TOLERANCE)
            .unwrap();

        assert!((velocity.magnitude() - 3.0).abs() < 1e-9);
        assert!(velocity.y < 0.0, "Shot should aim at the release point");
    }

    #[test]
    fn test_no_shot_while_cue_ball_moving() {
        let mut shot = controller();
        shot.press();
        shot.advance(DT);

        let fired = shot.release(Vec2::new(1.0, 0.0), Vec2::ZERO, 2.0, TOLERANCE);

        assert!(fired.is_none());
        // State still resets
        assert!(!shot.is_charging());
        assert_eq!(shot.progress(), 0.0);
    }

    #[test]
    fn test_release_resets_state() {
        let mut shot = controller();
        shot.press();
        for _ in 0..10 {
            shot.advance(DT);
        }
        shot.release(Vec2::new(1.0, 1.0), Vec2::ZERO, 0.0, TOLERANCE);

        assert!(!shot.is_charging());
        assert_eq!(shot.progress(), 0.0);
    }

    #[test]
    fn test_release_at_cue_position_fires_nothing() {
        // Aiming exactly at the cue ball gives no direction to shoot in
        let mut shot = controller();
        shot.press();
        for _ in 0..60 {
            shot.advance(DT);
        }

        let velocity = shot
            .release(Vec2::new(2.0, 3.0), Vec2::new(2.0, 3.0), 0.0, TOLERANCE)
            .unwrap();

        assert_eq!(velocity, Vec2::ZERO);
    }
}
