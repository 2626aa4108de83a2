use parking_lot::Mutex;
use tracing::trace;

use kiwi_core::Guarded;
use kiwi_core::messages::{DistanceReading, GroundSteeringRequest, PedalPositionRequest, VoltageReading};

use crate::ir::ir_voltage_to_distance;
use crate::params::BehaviorParams;
use crate::policy::{DriveMode, Perception, Recovery};

/// Reactive controller for the Kiwi robot.
///
/// Setters are called from bus callbacks and [`step`](Self::step) from the
/// tick driver, concurrently. All readings start at zero until the first
/// sample arrives.
#[derive(Debug, Default)]
pub struct Behavior {
    front_ultrasonic: Guarded<DistanceReading>,
    rear_ultrasonic: Guarded<DistanceReading>,
    left_ir: Guarded<VoltageReading>,
    right_ir: Guarded<VoltageReading>,
    ground_steering: Guarded<GroundSteeringRequest>,
    pedal_position: Guarded<PedalPositionRequest>,
    recovery: Mutex<Recovery>,
}

impl Behavior {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_front_distance(&self, reading: DistanceReading) {
        self.front_ultrasonic.set(reading);
    }

    pub fn set_rear_distance(&self, reading: DistanceReading) {
        self.rear_ultrasonic.set(reading);
    }

    pub fn set_left_voltage(&self, reading: VoltageReading) {
        self.left_ir.set(reading);
    }

    pub fn set_right_voltage(&self, reading: VoltageReading) {
        self.right_ir.set(reading);
    }

    pub fn front_distance(&self) -> DistanceReading {
        self.front_ultrasonic.get()
    }

    pub fn rear_distance(&self) -> DistanceReading {
        self.rear_ultrasonic.get()
    }

    pub fn left_voltage(&self) -> VoltageReading {
        self.left_ir.get()
    }

    pub fn right_voltage(&self) -> VoltageReading {
        self.right_ir.get()
    }

    /// Latest left IR reading converted to a distance.
    pub fn left_ir_distance(&self) -> f64 {
        ir_voltage_to_distance(self.left_ir.get().voltage)
    }

    /// Latest right IR reading converted to a distance.
    pub fn right_ir_distance(&self) -> f64 {
        ir_voltage_to_distance(self.right_ir.get().voltage)
    }

    pub fn steering_command(&self) -> GroundSteeringRequest {
        self.ground_steering.get()
    }

    pub fn pedal_command(&self) -> PedalPositionRequest {
        self.pedal_position.get()
    }

    pub fn mode(&self) -> DriveMode {
        self.recovery.lock().mode()
    }

    /// Advance the controller by one tick.
    ///
    /// Takes one consistent snapshot of all four sensors, runs the policy
    /// without holding any sensor lock, then publishes steering and pedal
    /// together.
    pub fn step(&self, params: &BehaviorParams) {
        let (front, rear, left, right) = {
            let front = self.front_ultrasonic.lock();
            let rear = self.rear_ultrasonic.lock();
            let left = self.left_ir.lock();
            let right = self.right_ir.lock();
            (*front, *rear, *left, *right)
        };

        let perception = Perception {
            front: front.distance,
            rear: rear.distance,
            left: ir_voltage_to_distance(left.voltage),
            right: ir_voltage_to_distance(right.voltage),
        };

        let (command, mode) = {
            let mut recovery = self.recovery.lock();
            let command = recovery.tick(&perception, params);
            (command, recovery.mode())
        };
        trace!(?perception, ?command, ?mode, "Behavior step");

        let mut ground_steering = self.ground_steering.lock();
        let mut pedal_position = self.pedal_position.lock();
        *ground_steering = GroundSteeringRequest {
            ground_steering: command.steering,
        };
        *pedal_position = PedalPositionRequest {
            position: command.pedal,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn params() -> BehaviorParams {
        BehaviorParams {
            forward_speed: 0.2,
            front_stop_distance: 0.6,
            rear_stop_distance: 0.2,
            wall_goal_distance: 0.2,
            wall_detect_distance: 0.3,
            reverse_time_limit: 1.0,
            ground_steering: 0.05,
            wall_gain: 2.0,
            reverse_speed: 0.15,
            add_angle_after_reverse: 0.3,
            forward_time_after_reverse_limit: 0.5,
            frequency: 10.0,
        }
    }

    #[test]
    fn test_getters_return_last_set_value() {
        let behavior = Behavior::new();
        behavior.set_front_distance(DistanceReading { distance: 0.7 });
        behavior.set_rear_distance(DistanceReading { distance: -1.0 });
        behavior.set_left_voltage(VoltageReading { voltage: 1.25 });
        behavior.set_right_voltage(VoltageReading { voltage: f32::MAX });

        assert_eq!(behavior.front_distance().distance, 0.7);
        assert_eq!(behavior.rear_distance().distance, -1.0);
        assert_eq!(behavior.left_voltage().voltage, 1.25);
        assert_eq!(behavior.right_voltage().voltage, f32::MAX);
        assert_eq!(behavior.left_ir_distance(), ir_voltage_to_distance(1.25));
    }

    #[test]
    fn test_commands_start_at_zero() {
        let behavior = Behavior::new();
        assert_eq!(behavior.steering_command().ground_steering, 0.0);
        assert_eq!(behavior.pedal_command().position, 0.0);
        assert_eq!(behavior.mode(), DriveMode::Normal);
    }

    #[test]
    fn test_unset_front_reads_zero_and_reverses() {
        // Zero front range is below any positive stop distance.
        let behavior = Behavior::new();
        behavior.set_rear_distance(DistanceReading { distance: 1.0 });
        behavior.step(&params());
        assert!(behavior.mode().is_reversing());
        assert_eq!(behavior.pedal_command().position, -0.15);
    }

    #[test]
    fn test_obstacle_scenario() {
        let p = params();
        let behavior = Behavior::new();
        // 0 V reads as ~56 at the sides, far above the wall detection distance.
        behavior.set_left_voltage(VoltageReading { voltage: 0.0 });
        behavior.set_right_voltage(VoltageReading { voltage: 0.0 });
        behavior.set_rear_distance(DistanceReading { distance: 1.0 });
        behavior.set_front_distance(DistanceReading { distance: 1.0 });

        behavior.step(&p);
        let previous = behavior.steering_command().ground_steering;
        assert_eq!(previous, p.ground_steering);
        assert_eq!(behavior.pedal_command().position, p.forward_speed);

        behavior.set_front_distance(DistanceReading { distance: 0.5 });
        behavior.step(&p);
        assert!(behavior.mode().is_reversing());
        assert_eq!(behavior.pedal_command().position, -p.reverse_speed);
        assert_eq!(behavior.steering_command().ground_steering, -previous);
    }

    #[test]
    fn test_equal_walls_at_goal_keep_trim() {
        let mut p = params();
        let voltage = 1.6;
        let distance = ir_voltage_to_distance(voltage);
        p.wall_goal_distance = distance as f32;
        p.wall_detect_distance = distance as f32 + 1.0;

        let behavior = Behavior::new();
        behavior.set_front_distance(DistanceReading { distance: 2.0 });
        behavior.set_rear_distance(DistanceReading { distance: 2.0 });
        behavior.set_left_voltage(VoltageReading { voltage });
        behavior.set_right_voltage(VoltageReading { voltage });
        behavior.step(&p);

        assert_eq!(behavior.steering_command().ground_steering, p.ground_steering);
    }

    #[test]
    fn test_extreme_voltages_give_finite_steering() {
        let p = params();
        let cases = [(1.0e13, 0.0), (0.0, 1.0e13), (f32::MAX, 1.0e13), (f32::MAX, f32::MAX)];
        for (left, right) in cases {
            let behavior = Behavior::new();
            behavior.set_front_distance(DistanceReading { distance: 2.0 });
            behavior.set_rear_distance(DistanceReading { distance: 2.0 });
            behavior.set_left_voltage(VoltageReading { voltage: left });
            behavior.set_right_voltage(VoltageReading { voltage: right });
            behavior.step(&p);

            let steering = behavior.steering_command().ground_steering;
            assert!(steering.is_finite(), "left {} V, right {} V gave {}", left, right, steering);
            assert_eq!(behavior.pedal_command().position, p.forward_speed);
        }
    }

    #[test]
    fn test_concurrent_setters_and_steps() {
        let p = params();
        let behavior = Arc::new(Behavior::new());

        let writer = {
            let behavior = Arc::clone(&behavior);
            std::thread::spawn(move || {
                for i in 0..500 {
                    let d = (i % 10) as f32 * 0.1;
                    behavior.set_front_distance(DistanceReading { distance: d });
                    behavior.set_rear_distance(DistanceReading { distance: 1.0 - d });
                    behavior.set_left_voltage(VoltageReading { voltage: d });
                    behavior.set_right_voltage(VoltageReading { voltage: 1.0 - d });
                }
            })
        };

        for _ in 0..500 {
            behavior.step(&p);
            assert!(behavior.steering_command().ground_steering.is_finite());
            assert!(behavior.pedal_command().position.is_finite());
        }
        writer.join().unwrap();
    }
}
