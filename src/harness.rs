use serde::Deserialize;

use kiwi_core::messages::WheelSpeedRequest;

/// Open-loop wheel-speed ramp sent alongside the behavior commands so the
/// plant model has something to integrate.
///
/// Up to `t1` the right wheel ramps from 0 to `v0` with the left wheel at
/// rest. Until `t2` the left wheel ramps up behind it. After `t2` both stop.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct WheelSpeedProfile {
    pub v0: f32,
    pub t1: f32,
    pub t2: f32,
}

impl WheelSpeedProfile {
    /// Left and right requests at `t` seconds into the run.
    pub fn speeds_at(&self, t: f32) -> (WheelSpeedRequest, WheelSpeedRequest) {
        let (left, right) = if t <= self.t1 {
            (0.0, self.v0 * (t / self.t1))
        } else if t <= self.t2 {
            (self.v0 * ((t - self.t1) / self.t2), self.v0)
        } else {
            (0.0, 0.0)
        };

        (
            WheelSpeedRequest { wheel_speed: left },
            WheelSpeedRequest { wheel_speed: right },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    const EPSILON: f32 = 1e-6;

    fn profile() -> WheelSpeedProfile {
        WheelSpeedProfile { v0: 0.5, t1: 3.0, t2: 10.0 }
    }

    #[test]
    fn test_right_wheel_ramps_first() {
        let (left, right) = profile().speeds_at(1.5);
        assert_eq!(left.wheel_speed, 0.0);
        assert!((right.wheel_speed - 0.25).abs() < EPSILON);

        let (_, right) = profile().speeds_at(3.0);
        assert!((right.wheel_speed - 0.5).abs() < EPSILON);
    }

    #[test]
    fn test_left_wheel_follows() {
        // 0.5 * (8 - 3) / 10
        let (left, right) = profile().speeds_at(8.0);
        assert!((left.wheel_speed - 0.25).abs() < EPSILON);
        assert_eq!(right.wheel_speed, 0.5);
    }

    #[test]
    fn test_stops_after_profile() {
        let (left, right) = profile().speeds_at(10.5);
        assert_eq!(left.wheel_speed, 0.0);
        assert_eq!(right.wheel_speed, 0.0);
    }
}
