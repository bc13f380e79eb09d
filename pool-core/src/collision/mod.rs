//! Collision detection and resolution for the billiards simulation.
//!
//! This module handles:
//! - **Detection**: the geometric predicates that gate pocket capture,
//!   cushion reflection, and ball-ball contact
//! - **Resolution**: post-collision velocities and the sub-frame contact time
//!
//! Detection works on each ball's *predicted* end position for the frame, so
//! a contact is seen one step before the overlap would be rendered.

pub mod detection;
pub mod resolution;

pub use detection::*;
pub use resolution::*;
