//! The simulation context and per-frame physics loop.
//!
//! [`Simulation`] owns all mutable state of a rack: ball positions and
//! velocities, the visual handles, and the shot charge. The embedding
//! application drives it with three entry points:
//!
//! - [`Simulation::update`] once per rendered frame with the frame's `dt`
//! - [`Simulation::pointer_pressed`] / [`Simulation::pointer_released`] from
//!   input dispatch
//!
//! ## Frame algorithm
//!
//! Each frame, every ball is routed through exactly one of: pocket capture,
//! cushion reflection, ball-ball collision, or free glide. A ball that was
//! the target of a collision earlier in the scan is already handled and is
//! not processed again. Friction is applied to all balls once at the end.
//!
//! Once every ball is slower than the rest tolerance the whole step is
//! skipped; a settled table has nothing to integrate.

use crate::collision::{CollisionConfig, CollisionDetector, CollisionResolver};
use crate::forces::SlidingFriction;
use crate::scene::{Engine, MeshId, Scene};
use crate::shot::ShotController;
use crate::types::{BallSet, SimulationParams, Table, Vec2, BALL_COUNT, CUE_BALL, POCKET_COUNT};

// =============================================================================
// Table Visuals
// =============================================================================

/// Handles for the visuals the simulation has created in the scene.
///
/// A ball slot goes back to `None` when its ball is pocketed; the whole view
/// is torn down and rebuilt on a rack reset.
#[derive(Debug)]
struct TableView {
    pockets: [Option<MeshId>; POCKET_COUNT],
    balls: [Option<MeshId>; BALL_COUNT],
}

impl TableView {
    fn empty() -> Self {
        Self {
            pockets: [None; POCKET_COUNT],
            balls: [None; BALL_COUNT],
        }
    }

    fn init(&mut self, table: &Table, balls: &BallSet, scene: &mut dyn Scene) {
        scene.setup_background(table.width, table.height);

        for (i, position) in table.pocket_positions().iter().enumerate() {
            debug_assert!(self.pockets[i].is_none());
            let mesh = scene.create_pocket_mesh(table.pocket_radius);
            scene.place_mesh(mesh, position.x, position.y, 0.0);
            self.pockets[i] = Some(mesh);
        }

        for i in 0..BALL_COUNT {
            debug_assert!(self.balls[i].is_none());
            let mesh = scene.create_ball_mesh(table.ball_radius);
            let position = balls.position(i);
            scene.place_mesh(mesh, position.x, position.y, 0.0);
            self.balls[i] = Some(mesh);
        }
    }

    fn deinit(&mut self, scene: &mut dyn Scene) {
        for mesh in self.pockets.iter_mut().chain(self.balls.iter_mut()) {
            if let Some(mesh) = mesh.take() {
                scene.destroy_mesh(mesh);
            }
        }
    }

    fn place_ball(&self, ball: usize, position: Vec2, scene: &mut dyn Scene) {
        if let Some(mesh) = self.balls[ball] {
            scene.place_mesh(mesh, position.x, position.y, 0.0);
        }
    }

    fn remove_ball(&mut self, ball: usize, scene: &mut dyn Scene) {
        if let Some(mesh) = self.balls[ball].take() {
            scene.destroy_mesh(mesh);
        }
    }
}

// =============================================================================
// Simulation
// =============================================================================

/// A running billiards rack.
pub struct Simulation {
    table: Table,
    params: SimulationParams,
    balls: BallSet,
    view: TableView,
    detector: CollisionDetector,
    friction: SlidingFriction,
    shot: ShotController,
}

impl Simulation {
    /// Set up a fresh rack: configure the engine, build the scene visuals,
    /// and place every ball at its starting position.
    pub fn new(
        table: Table,
        params: SimulationParams,
        scene: &mut dyn Scene,
        engine: &mut dyn Engine,
    ) -> Self {
        engine.set_target_fps(params.target_fps);

        let balls = BallSet::racked(&table);
        let mut view = TableView::empty();
        view.init(&table, &balls, scene);

        let detector = CollisionDetector::with_config(CollisionConfig {
            slack: params.rest_tolerance,
        });
        let friction = SlidingFriction::new(params.friction);
        let shot = ShotController::new(&params);

        Self {
            table,
            params,
            balls,
            view,
            detector,
            friction,
            shot,
        }
    }

    /// Advance the simulation by `dt` seconds: physics, then shot charge,
    /// then the HUD report.
    pub fn update(&mut self, dt: f64, scene: &mut dyn Scene) {
        self.physics_step(dt, scene);
        self.shot.advance(dt);
        scene.update_progress_bar(self.shot.progress());
    }

    /// Pointer went down somewhere on the table: start charging a shot.
    pub fn pointer_pressed(&mut self, _x: f64, _y: f64) {
        self.shot.press();
    }

    /// Pointer released at `(x, y)`: fire the cue ball toward the release
    /// point, unless it is still rolling.
    pub fn pointer_released(&mut self, x: f64, y: f64) {
        let fired = self.shot.release(
            Vec2::new(x, y),
            self.balls.position(CUE_BALL),
            self.balls.speed(CUE_BALL),
            self.params.rest_tolerance,
        );
        if let Some(velocity) = fired {
            tracing::debug!(
                "shot fired at ({:.2}, {:.2}) m/s",
                velocity.x,
                velocity.y
            );
            self.balls.set_velocity(CUE_BALL, velocity);
        }
    }

    fn physics_step(&mut self, dt: f64, scene: &mut dyn Scene) {
        if self.balls.all_stopped(self.params.rest_tolerance) {
            return;
        }

        let mut handled = [false; BALL_COUNT];
        for i in 0..BALL_COUNT {
            if handled[i]
                || !self.balls.is_active(i)
                || self.balls.speed(i) <= self.params.rest_tolerance
            {
                continue;
            }

            let end = self.balls.position(i) + self.balls.velocity(i) * dt;

            if let Some(pocket) = self.detector.pocket_at(&self.table, end) {
                if i == CUE_BALL {
                    tracing::info!("cue ball fell into pocket {}, racking up", pocket);
                    self.reset_rack(scene);
                    // The fresh rack must not be advanced with this frame's dt
                    return;
                }
                tracing::debug!("ball {} captured by pocket {}", i, pocket);
                self.balls.capture(i);
                self.view.remove_ball(i, scene);
                continue;
            }

            let contact = self.detector.border_contact(&self.table, end);
            if contact.any() {
                let mut velocity = self.balls.velocity(i);
                if contact.x {
                    velocity.x = -velocity.x;
                }
                if contact.y {
                    velocity.y = -velocity.y;
                }
                self.balls.set_velocity(i, velocity);
                // The ball holds its pre-contact position for this frame;
                // the reflected velocity takes effect next frame
                continue;
            }

            let j = self.detector.closest_ball(&self.table, &self.balls, end, i);
            if j == i {
                self.balls.set_position(i, end);
                self.view.place_ball(i, end, scene);
                continue;
            }

            // First touch approximated from the current separation at the
            // current speed; accurate only while dt stays small
            let separation = (self.balls.position(i) - self.balls.position(j)).magnitude();
            let dtau = CollisionResolver::time_to_contact(
                separation,
                self.balls.speed(i),
                self.table.ball_radius,
            );
            let contact_position = self.balls.position(i) + self.balls.velocity(i) * dtau;

            CollisionResolver::resolve(&mut self.balls, i, j);

            let remaining = dt - dtau;
            let subject_end = contact_position + self.balls.velocity(i) * remaining;
            let target_end = self.balls.position(j) + self.balls.velocity(j) * remaining;
            self.balls.set_position(i, subject_end);
            self.balls.set_position(j, target_end);
            self.view.place_ball(i, subject_end, scene);
            self.view.place_ball(j, target_end, scene);

            handled[i] = true;
            handled[j] = true;
        }

        self.friction
            .apply(&mut self.balls, self.params.rest_tolerance, dt);
    }

    /// Tear down every visual and restart the rack from its starting layout.
    fn reset_rack(&mut self, scene: &mut dyn Scene) {
        self.view.deinit(scene);
        self.balls = BallSet::racked(&self.table);
        self.view.init(&self.table, &self.balls, scene);
    }

    pub fn balls(&self) -> &BallSet {
        &self.balls
    }

    /// Direct ball-state access, for scripting front ends and tests.
    pub fn balls_mut(&mut self) -> &mut BallSet {
        &mut self.balls
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    pub fn charge_progress(&self) -> f64 {
        self.shot.progress()
    }

    /// True when every ball is slower than the rest tolerance.
    pub fn is_settled(&self) -> bool {
        self.balls.all_stopped(self.params.rest_tolerance)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::constants;

    /// Scene double that records every call the simulation makes.
    #[derive(Default)]
    struct RecordingScene {
        next_id: u32,
        created: usize,
        destroyed: usize,
        placements: Vec<(MeshId, f64, f64)>,
        progress: Vec<f64>,
        backgrounds: usize,
        fps: Vec<u32>,
    }

    impl RecordingScene {
        fn next_mesh(&mut self) -> MeshId {
            let id = MeshId(self.next_id);
            self.next_id += 1;
            self.created += 1;
            id
        }
    }

    impl Scene for RecordingScene {
        fn setup_background(&mut self, _width: f64, _height: f64) {
            self.backgrounds += 1;
        }

        fn create_pocket_mesh(&mut self, _radius: f64) -> MeshId {
            self.next_mesh()
        }

        fn create_ball_mesh(&mut self, _radius: f64) -> MeshId {
            self.next_mesh()
        }

        fn place_mesh(&mut self, mesh: MeshId, x: f64, y: f64, _z: f64) {
            self.placements.push((mesh, x, y));
        }

        fn destroy_mesh(&mut self, _mesh: MeshId) {
            self.destroyed += 1;
        }

        fn update_progress_bar(&mut self, value: f64) {
            self.progress.push(value);
        }
    }

    impl Engine for RecordingScene {
        fn set_target_fps(&mut self, fps: u32) {
            self.fps.push(fps);
        }
    }

    fn new_sim(scene: &mut RecordingScene) -> Simulation {
        let mut engine = RecordingScene::default();
        let sim = Simulation::new(
            Table::standard(),
            SimulationParams::standard(),
            scene,
            &mut engine,
        );
        assert_eq!(engine.fps, vec![60]);
        sim
    }

    const DT: f64 = 1.0 / 60.0;

    #[test]
    fn test_init_builds_all_visuals() {
        let mut scene = RecordingScene::default();
        let _sim = new_sim(&mut scene);

        assert_eq!(scene.backgrounds, 1);
        assert_eq!(scene.created, POCKET_COUNT + BALL_COUNT);
        assert_eq!(scene.placements.len(), POCKET_COUNT + BALL_COUNT);
    }

    #[test]
    fn test_settled_table_frame_is_inert() {
        let mut scene = RecordingScene::default();
        let mut sim = new_sim(&mut scene);
        let before = sim.balls().clone();
        let placements_before = scene.placements.len();

        sim.update(DT, &mut scene);

        assert_eq!(*sim.balls(), before, "A settled table must not move");
        assert_eq!(scene.placements.len(), placements_before);
    }

    #[test]
    fn test_free_glide_advances_position_and_applies_friction() {
        let mut scene = RecordingScene::default();
        let mut sim = new_sim(&mut scene);
        sim.balls_mut().set_velocity(CUE_BALL, Vec2::new(1.0, 0.0));

        sim.update(0.1, &mut scene);

        let position = sim.balls().position(CUE_BALL);
        assert!((position.x - -4.4).abs() < 1e-9);
        assert!(position.y.abs() < 1e-9);

        let expected_speed = 1.0 - 0.03 * constants::GRAVITY * 0.1;
        assert!((sim.balls().speed(CUE_BALL) - expected_speed).abs() < 1e-9);
    }

    #[test]
    fn test_head_on_shot_hands_velocity_to_target() {
        let mut scene = RecordingScene::default();
        let mut sim = new_sim(&mut scene);
        {
            let balls = sim.balls_mut();
            balls.set_position(CUE_BALL, Vec2::new(-4.5, 0.0));
            balls.set_velocity(CUE_BALL, Vec2::new(10.0, 0.0));
            balls.set_position(1, Vec2::new(-3.5, 0.0));
        }

        sim.update(0.05, &mut scene);

        // All of the cue ball's velocity lay along the line of centers
        assert!(
            sim.balls().speed(CUE_BALL) < 1e-9,
            "Cue ball should stop dead, got {:?}",
            sim.balls().velocity(CUE_BALL)
        );
        let target = sim.balls().velocity(1);
        assert!(
            (target.x - 10.0).abs() < 0.05,
            "Target should carry the shot, got vx={}",
            target.x
        );
        assert!(target.y.abs() < 1e-9);

        // Contact at 0.04s: cue advanced to the touch point, target carried on
        assert!((sim.balls().position(CUE_BALL).x - -4.1).abs() < 1e-9);
        assert!((sim.balls().position(1).x - -3.4).abs() < 1e-9);
    }

    #[test]
    fn test_cushion_reflects_velocity_and_holds_position() {
        let mut scene = RecordingScene::default();
        let mut sim = new_sim(&mut scene);
        {
            let balls = sim.balls_mut();
            balls.set_position(CUE_BALL, Vec2::new(7.4, 0.0));
            balls.set_velocity(CUE_BALL, Vec2::new(1.0, 0.0));
        }

        sim.update(0.01, &mut scene);

        let velocity = sim.balls().velocity(CUE_BALL);
        let expected = -(1.0 - 0.03 * constants::GRAVITY * 0.01);
        assert!(
            (velocity.x - expected).abs() < 1e-9,
            "X velocity should flip, got {}",
            velocity.x
        );
        assert_eq!(velocity.y, 0.0);
        assert_eq!(sim.balls().position(CUE_BALL), Vec2::new(7.4, 0.0));
    }

    #[test]
    fn test_object_ball_capture_is_permanent() {
        let mut scene = RecordingScene::default();
        let mut sim = new_sim(&mut scene);
        {
            let balls = sim.balls_mut();
            balls.set_position(1, Vec2::new(7.0, 3.8));
            balls.set_velocity(1, Vec2::new(5.0, 2.0));
        }

        sim.update(0.1, &mut scene);

        assert!(!sim.balls().is_active(1));
        assert_eq!(sim.balls().velocity(1), Vec2::ZERO);
        assert_eq!(scene.destroyed, 1);

        // The captured ball never moves again
        let parked = sim.balls().position(1);
        sim.update(0.1, &mut scene);
        assert_eq!(sim.balls().position(1), parked);
    }

    #[test]
    fn test_cue_ball_capture_resets_the_rack() {
        let mut scene = RecordingScene::default();
        let mut sim = new_sim(&mut scene);
        {
            let balls = sim.balls_mut();
            balls.set_position(CUE_BALL, Vec2::new(7.0, 3.8));
            balls.set_velocity(CUE_BALL, Vec2::new(5.0, 2.0));
        }

        sim.update(0.1, &mut scene);

        let rack = Table::standard().rack_positions();
        for i in 0..BALL_COUNT {
            assert_eq!(sim.balls().position(i), rack[i], "Ball {} not re-racked", i);
            assert_eq!(sim.balls().velocity(i), Vec2::ZERO);
            assert!(sim.balls().is_active(i));
        }

        // Old visuals torn down, new rack built
        assert_eq!(scene.destroyed, POCKET_COUNT + BALL_COUNT);
        assert_eq!(scene.created, 2 * (POCKET_COUNT + BALL_COUNT));
        assert_eq!(scene.backgrounds, 2);
    }

    #[test]
    fn test_charge_progress_reaches_the_hud() {
        let mut scene = RecordingScene::default();
        let mut sim = new_sim(&mut scene);

        sim.pointer_pressed(0.0, 0.0);
        sim.update(0.5, &mut scene);
        sim.update(0.7, &mut scene);
        sim.pointer_released(0.0, 0.0);
        sim.update(DT, &mut scene);

        assert_eq!(scene.progress.len(), 3);
        assert!((scene.progress[0] - 0.5).abs() < 1e-9);
        assert_eq!(scene.progress[1], 1.0, "Charge should cap at full");
        assert_eq!(scene.progress[2], 0.0, "Release should zero the charge");
    }

    #[test]
    fn test_release_fires_cue_ball_toward_pointer() {
        let mut scene = RecordingScene::default();
        let mut sim = new_sim(&mut scene);

        sim.pointer_pressed(0.0, 0.0);
        sim.update(1.0, &mut scene); // full charge
        sim.pointer_released(0.0, 0.0);

        // Cue ball sits at (-4.5, 0); aiming at the origin fires along +X
        let velocity = sim.balls().velocity(CUE_BALL);
        assert!((velocity.x - 6.0).abs() < 1e-9);
        assert!(velocity.y.abs() < 1e-9);
    }

    #[test]
    fn test_release_while_cue_ball_rolls_is_ignored() {
        let mut scene = RecordingScene::default();
        let mut sim = new_sim(&mut scene);
        sim.balls_mut().set_velocity(CUE_BALL, Vec2::new(3.0, 0.0));

        sim.pointer_pressed(0.0, 0.0);
        sim.update(DT, &mut scene);
        let rolling = sim.balls().velocity(CUE_BALL);

        sim.pointer_released(0.0, -2.0);

        assert_eq!(sim.balls().velocity(CUE_BALL), rolling);
        assert_eq!(sim.charge_progress(), 0.0);
    }

    #[test]
    fn test_slow_break_settles() {
        let mut scene = RecordingScene::default();
        let mut sim = new_sim(&mut scene);
        sim.balls_mut().set_velocity(CUE_BALL, Vec2::new(0.5, 0.0));
        assert!(!sim.is_settled());

        for _ in 0..600 {
            sim.update(DT, &mut scene);
        }

        assert!(sim.is_settled(), "Friction should bring the table to rest");
        let position = sim.balls().position(CUE_BALL);
        assert!(position.x > -4.5 && position.x < -4.0);
    }
}
