//! Closed-loop behavior controller for the Kiwi robot.
//!
//! Four sensor channels (front/rear ultrasonic range, left/right IR voltage)
//! drive two commands (ground steering, pedal position). The policy follows
//! walls proportionally and backs away from frontal obstacles with a timed
//! reverse, followed by a short nudge towards the clearer side.

pub mod behavior;
pub mod ir;
pub mod params;
pub mod policy;

pub use behavior::Behavior;
pub use ir::ir_voltage_to_distance;
pub use params::BehaviorParams;
pub use policy::{Command, DriveMode, Perception, Recovery, wall_correction};
