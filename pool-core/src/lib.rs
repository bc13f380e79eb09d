//! # Pool Core
//!
//! A 2D physics engine for billiards on a six-pocket table.
//!
//! ## Architecture
//!
//! - `types`: Core data structures (Vec2, ball storage, table geometry)
//! - `collision`: Geometric predicates and elastic impulse exchange
//! - `forces`: Sliding-friction deceleration
//! - `shot`: Charge-and-release shot controller
//! - `scene`: Capability traits for the rendering and timing collaborators
//! - `simulation`: Per-frame physics loop and rack lifecycle
//! - `config`: YAML-based table/parameter configuration loader

pub mod collision;
pub mod config;
pub mod forces;
pub mod scene;
pub mod shot;
pub mod simulation;
pub mod types;
