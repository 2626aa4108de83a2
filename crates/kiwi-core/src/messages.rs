//! Message records exchanged over the Kiwi bus.
//!
//! Paired channels share one message type and are told apart only by the
//! envelope's sender stamp: `0` is the front/left channel, anything else the
//! rear/right one.

use serde::{Deserialize, Serialize};

pub use kiwi_kinematics::KinematicState;

/// Sender stamp of the front ultrasonic sensor.
pub const STAMP_FRONT: u32 = 0;
/// Sender stamp of the rear ultrasonic sensor.
pub const STAMP_REAR: u32 = 1;
/// Sender stamp of the left IR sensor or left wheel.
pub const STAMP_LEFT: u32 = 0;
/// Sender stamp of the right IR sensor or right wheel.
pub const STAMP_RIGHT: u32 = 1;
/// Sender stamp used for actuation requests and plant output.
pub const STAMP_ACTUATION: u32 = 0;

/// Which of two paired channels a sender stamp addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// Stamp `0`: front distance, left voltage or left wheel.
    Primary,
    /// Any non-zero stamp: rear distance, right voltage or right wheel.
    Secondary,
}

impl Channel {
    pub fn from_stamp(sender_stamp: u32) -> Self {
        if sender_stamp == 0 {
            Channel::Primary
        } else {
            Channel::Secondary
        }
    }
}

/// Ultrasonic range (m).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DistanceReading {
    pub distance: f32,
}

/// Analog IR proximity sensor output (V).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct VoltageReading {
    pub voltage: f32,
}

/// Signed steering angle, positive to the left.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GroundSteeringRequest {
    pub ground_steering: f32,
}

/// Signed normalized throttle, negative when reversing.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PedalPositionRequest {
    pub position: f32,
}

/// Commanded linear speed of one wheel.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WheelSpeedRequest {
    pub wheel_speed: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_from_stamp() {
        assert_eq!(Channel::from_stamp(STAMP_FRONT), Channel::Primary);
        assert_eq!(Channel::from_stamp(STAMP_REAR), Channel::Secondary);
        assert_eq!(Channel::from_stamp(7), Channel::Secondary);
    }

    #[test]
    fn test_messages_default_to_zero() {
        assert_eq!(DistanceReading::default().distance, 0.0);
        assert_eq!(VoltageReading::default().voltage, 0.0);
        assert_eq!(GroundSteeringRequest::default().ground_steering, 0.0);
        assert_eq!(PedalPositionRequest::default().position, 0.0);
        assert_eq!(WheelSpeedRequest::default().wheel_speed, 0.0);
    }
}
