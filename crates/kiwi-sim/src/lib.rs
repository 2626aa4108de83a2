//! Kinematic plant model of the Kiwi robot.
//!
//! [`SingleTrackModel`] accepts wheel-speed requests from the bus and turns
//! them into the kinematic state published for closed-loop simulation.

use parking_lot::Mutex;
use tracing::trace;

use kiwi_core::Guarded;
use kiwi_core::messages::WheelSpeedRequest;
use kiwi_kinematics::{DifferentialDrive, KinematicState, SingleTrackIntegrator, WheelSpeeds};

/// Thread-safe differential-drive plant.
///
/// The integrator accumulates on every [`step`](Self::step), so the reported
/// state depends on the whole call history. All accumulators and wheel speeds
/// start at zero.
#[derive(Debug)]
pub struct SingleTrackModel {
    wheel_speed_left: Guarded<f32>,
    wheel_speed_right: Guarded<f32>,
    integrator: Mutex<SingleTrackIntegrator>,
}

impl SingleTrackModel {
    /// A Kiwi-sized plant.
    pub fn new() -> Self {
        Self::with_drive(DifferentialDrive::default())
    }

    pub fn with_drive(drive: DifferentialDrive) -> Self {
        Self {
            wheel_speed_left: Guarded::new(0.0),
            wheel_speed_right: Guarded::new(0.0),
            integrator: Mutex::new(SingleTrackIntegrator::new(drive)),
        }
    }

    pub fn set_wheel_speed_left(&self, request: WheelSpeedRequest) {
        self.wheel_speed_left.set(request.wheel_speed);
    }

    pub fn set_wheel_speed_right(&self, request: WheelSpeedRequest) {
        self.wheel_speed_right.set(request.wheel_speed);
    }

    pub fn wheel_speeds(&self) -> WheelSpeeds {
        let left = self.wheel_speed_left.lock();
        let right = self.wheel_speed_right.lock();
        WheelSpeeds::new(f64::from(*left), f64::from(*right))
    }

    /// Integrate one time step of `dt` seconds with the latest wheel speeds.
    pub fn step(&self, dt: f64) -> KinematicState {
        let wheel_speeds = self.wheel_speeds();
        let state = self.integrator.lock().integrate(wheel_speeds, dt);
        trace!(%wheel_speeds, %state, dt, "Plant step");
        state
    }
}

impl Default for SingleTrackModel {
    fn default() -> Self {
        Self::new()
    }
}
