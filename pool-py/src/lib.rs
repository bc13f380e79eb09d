//! Python bindings for the pool-core billiards physics engine.
//!
//! Provides a simple Python API:
//!
//! ```python
//! from pool_physics import Simulation
//!
//! sim = Simulation()
//! sim.pointer_pressed(0.0, 0.0)
//! for _ in range(60):
//!     sim.step(1.0 / 60.0)
//! sim.pointer_released(0.0, 0.0)
//!
//! while not sim.is_settled():
//!     sim.step(1.0 / 60.0)
//!     pos = sim.ball_position(0)
//!     print(f"Cue ball at ({pos.x}, {pos.y})")
//! ```

use pyo3::prelude::*;

use pool_core::scene::NullScene;
use pool_core::simulation::Simulation as CoreSimulation;
use pool_core::types::{SimulationParams, Table, Vec2 as CoreVec2, BALL_COUNT, CUE_BALL};

/// 2D vector for positions and velocities.
#[pyclass]
#[derive(Clone, Copy)]
pub struct Vec2 {
    #[pyo3(get, set)]
    pub x: f64,
    #[pyo3(get, set)]
    pub y: f64,
}

#[pymethods]
impl Vec2 {
    #[new]
    fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn __repr__(&self) -> String {
        format!("Vec2({:.4}, {:.4})", self.x, self.y)
    }

    fn magnitude(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    fn to_tuple(&self) -> (f64, f64) {
        (self.x, self.y)
    }
}

impl From<CoreVec2> for Vec2 {
    fn from(v: CoreVec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

impl From<Vec2> for CoreVec2 {
    fn from(v: Vec2) -> Self {
        CoreVec2::new(v.x, v.y)
    }
}

/// Main simulation class.
///
/// Runs the rack headless: scene and engine collaborators are no-ops, so
/// only the physics state is observable.
#[pyclass]
pub struct Simulation {
    sim: CoreSimulation,
    scene: NullScene,
}

#[pymethods]
impl Simulation {
    /// Create a new simulation with the standard table and parameters.
    #[new]
    fn new() -> Self {
        let mut scene = NullScene::default();
        let mut engine = NullScene::default();
        let sim = CoreSimulation::new(
            Table::standard(),
            SimulationParams::standard(),
            &mut scene,
            &mut engine,
        );
        Self { sim, scene }
    }

    /// Number of balls in the rack (index 0 is the cue ball).
    fn ball_count(&self) -> usize {
        BALL_COUNT
    }

    /// Get a ball's position as Vec2.
    fn ball_position(&self, ball: usize) -> Vec2 {
        self.sim.balls().position(ball).into()
    }

    /// Get a ball's velocity as Vec2.
    fn ball_velocity(&self, ball: usize) -> Vec2 {
        self.sim.balls().velocity(ball).into()
    }

    /// Get a ball's speed in m/s.
    fn ball_speed(&self, ball: usize) -> f64 {
        self.sim.balls().speed(ball)
    }

    /// Whether a ball is still on the table.
    fn ball_active(&self, ball: usize) -> bool {
        self.sim.balls().is_active(ball)
    }

    /// Set a ball's position.
    fn set_ball_position(&mut self, ball: usize, x: f64, y: f64) {
        if ball < BALL_COUNT {
            self.sim.balls_mut().set_position(ball, CoreVec2::new(x, y));
        }
    }

    /// Set a ball's velocity.
    fn set_ball_velocity(&mut self, ball: usize, x: f64, y: f64) {
        if ball < BALL_COUNT {
            self.sim.balls_mut().set_velocity(ball, CoreVec2::new(x, y));
        }
    }

    /// Current shot charge in [0, 1].
    #[getter]
    fn charge_progress(&self) -> f64 {
        self.sim.charge_progress()
    }

    /// True when every ball has come to rest.
    fn is_settled(&self) -> bool {
        self.sim.is_settled()
    }

    /// Get table dimensions as (width, height).
    fn table_dimensions(&self) -> (f64, f64) {
        (self.sim.table().width, self.sim.table().height)
    }

    /// Pointer went down: start charging a shot.
    fn pointer_pressed(&mut self, x: f64, y: f64) {
        self.sim.pointer_pressed(x, y);
    }

    /// Pointer released: fire the cue ball toward (x, y) if it has settled.
    fn pointer_released(&mut self, x: f64, y: f64) {
        self.sim.pointer_released(x, y);
    }

    /// Advance the simulation by dt seconds.
    fn step(&mut self, dt: f64) {
        self.sim.update(dt, &mut self.scene);
    }

    /// Run multiple steps at once (more efficient).
    fn step_n(&mut self, dt: f64, steps: usize) {
        for _ in 0..steps {
            self.step(dt);
        }
    }

    /// Get current state as dict for easy inspection.
    fn state_dict(&self) -> PyResult<PyObject> {
        Python::with_gil(|py| {
            let dict = pyo3::types::PyDict::new(py);
            dict.set_item("charge_progress", self.sim.charge_progress())?;
            dict.set_item("settled", self.sim.is_settled())?;
            for i in 0..BALL_COUNT {
                let position = self.sim.balls().position(i);
                let velocity = self.sim.balls().velocity(i);
                dict.set_item(format!("ball{}_x", i), position.x)?;
                dict.set_item(format!("ball{}_y", i), position.y)?;
                dict.set_item(format!("ball{}_vx", i), velocity.x)?;
                dict.set_item(format!("ball{}_vy", i), velocity.y)?;
                dict.set_item(format!("ball{}_active", i), self.sim.balls().is_active(i))?;
            }
            dict.set_item("cue_ball", CUE_BALL)?;
            Ok(dict.into_any().unbind())
        })
    }
}

/// Python module definition.
#[pymodule]
fn pool_physics(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<Vec2>()?;
    m.add_class::<Simulation>()?;
    Ok(())
}
