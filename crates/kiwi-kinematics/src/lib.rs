#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![doc = "A `no_std` library for Kiwi differential-drive kinematics."]
#![doc = ""]
#![doc = "This crate maps commanded wheel speeds to chassis speeds and integrates them"]
#![doc = "into the kinematic state reported by the Kiwi plant model."]

use core::fmt;
use libm::{cos, sin};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub mod error;
pub use error::KinematicsError;

/// Half the distance between the Kiwi drive wheels (m).
pub const KIWI_TRACK_RADIUS: f64 = 0.12;

/// Left and right wheel linear speeds.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WheelSpeeds {
    /// Left wheel linear speed (m/s), negative when reversing.
    pub left: f64,
    /// Right wheel linear speed (m/s), negative when reversing.
    pub right: f64,
}

impl WheelSpeeds {
    /// Construct wheel speeds.
    ///
    /// # Arguments
    ///
    /// * `left`: Left wheel linear speed (m/s).
    /// * `right`: Right wheel linear speed (m/s).
    pub const fn new(left: f64, right: f64) -> Self {
        WheelSpeeds { left, right }
    }
}

impl fmt::Display for WheelSpeeds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(vL: {:.2} m/s, vR: {:.2} m/s)", self.left, self.right)
    }
}

/// Linear and angular chassis velocities.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ChassisSpeeds {
    /// Linear speed of the chassis center (m/s).
    pub v: f64,
    /// Angular speed of the chassis (rad/s).
    pub omega: f64,
}

impl ChassisSpeeds {
    /// Construct chassis speeds.
    pub const fn new(v: f64, omega: f64) -> Self {
        ChassisSpeeds { v, omega }
    }
}

impl fmt::Display for ChassisSpeeds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(v: {:.2} m/s, ω: {:.2} rad/s)", self.v, self.omega)
    }
}

/// Kinematic state reported by the plant model.
///
/// The fields keep the names used on the bus, but they carry the integrated
/// accumulators of [`SingleTrackIntegrator`]: `vx`/`vy` grow like a position
/// and `yaw_rate` like a heading.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct KinematicState {
    /// Longitudinal accumulator.
    pub vx: f32,
    /// Lateral accumulator.
    pub vy: f32,
    /// Yaw accumulator.
    pub yaw_rate: f32,
}

impl fmt::Display for KinematicState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(vx: {:.3}, vy: {:.3}, yaw: {:.3})", self.vx, self.vy, self.yaw_rate)
    }
}

/// Differential‑drive kinematics helper.
///
/// Wheel speeds are linear, so the only geometry needed is the half-track
/// radius `R` between the chassis center and either wheel.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifferentialDrive {
    /// Half-track radius (m).
    track_radius: f64,
}

impl DifferentialDrive {
    /// Construct a new differential‑drive kinematics helper.
    ///
    /// # Errors
    ///
    /// Returns `Err(KinematicsError::InvalidTrackRadius)` if `track_radius` is not positive.
    pub const fn new(track_radius: f64) -> Result<Self, KinematicsError> {
        // Written as a negated comparison so NaN is rejected too.
        if !(track_radius > 0.0) {
            return Err(KinematicsError::InvalidTrackRadius("must be positive"));
        }
        Ok(DifferentialDrive { track_radius })
    }

    /// Returns the half-track radius.
    pub fn track_radius(&self) -> f64 {
        self.track_radius
    }

    /// Calculates the chassis speeds from the wheel speeds.
    ///
    /// The yaw rate is `-(left - right) / 2R`, positive when the right wheel
    /// runs faster (counter-clockwise).
    pub fn forward_kinematics(&self, wheel_speeds: WheelSpeeds) -> ChassisSpeeds {
        let v = (wheel_speeds.left + wheel_speeds.right) / 2.0;
        let omega = -((wheel_speeds.left - wheel_speeds.right) / (2.0 * self.track_radius));

        ChassisSpeeds::new(v, omega)
    }
}

impl Default for DifferentialDrive {
    fn default() -> Self {
        DifferentialDrive { track_radius: KIWI_TRACK_RADIUS }
    }
}

impl fmt::Display for DifferentialDrive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DifferentialDrive (R: {:.2} m)", self.track_radius)
    }
}

/// Forward-Euler integrator behind the Kiwi plant model.
///
/// Every call to [`integrate`](Self::integrate) adds to the yaw, longitudinal
/// and lateral accumulators, so the result depends on the call history and not
/// only on the latest wheel speeds. The yaw accumulator is updated first and
/// the translation uses the new heading.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SingleTrackIntegrator {
    drive: DifferentialDrive,
    yaw: f64,
    vx: f64,
    vy: f64,
}

impl SingleTrackIntegrator {
    /// Construct an integrator with all accumulators at zero.
    pub const fn new(drive: DifferentialDrive) -> Self {
        SingleTrackIntegrator { drive, yaw: 0.0, vx: 0.0, vy: 0.0 }
    }

    /// Returns the drive geometry in use.
    pub fn drive(&self) -> DifferentialDrive {
        self.drive
    }

    /// Integrate one time step of `dt` seconds.
    ///
    /// No input is rejected: negative `dt` integrates backwards and NaN or
    /// infinite speeds propagate into the state.
    pub fn integrate(&mut self, wheel_speeds: WheelSpeeds, dt: f64) -> KinematicState {
        let chassis_speeds = self.drive.forward_kinematics(wheel_speeds);

        self.yaw += chassis_speeds.omega * dt;
        self.vx += chassis_speeds.v * cos(self.yaw) * dt;
        self.vy += chassis_speeds.v * sin(self.yaw) * dt;

        self.state()
    }

    /// The current accumulators narrowed to the bus representation.
    pub fn state(&self) -> KinematicState {
        KinematicState {
            vx: self.vx as f32,
            vy: self.vy as f32,
            yaw_rate: self.yaw as f32,
        }
    }
}
