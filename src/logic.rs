use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use std::time::SystemTime;

use tracing::{debug, info};

use kiwi_behavior::{Behavior, BehaviorParams};
use kiwi_core::messages::{Channel, STAMP_ACTUATION, STAMP_LEFT, STAMP_RIGHT};
use kiwi_core::{Session, time_trigger};

use crate::harness::WheelSpeedProfile;

/// Wire a [`Behavior`] to the session and drive it at `params.frequency`.
///
/// Distance readings stamped 0 are the front sensor, voltage readings stamped
/// 0 the left IR sensor; any other stamp is the rear/right one. Every tick
/// publishes steering and pedal, then the test profile's wheel speeds.
pub fn spawn(
    session: &Session,
    params: BehaviorParams,
    profile: WheelSpeedProfile,
    verbose: bool,
    stop: Arc<AtomicBool>,
) -> kiwi_core::Result<JoinHandle<()>> {
    let behavior = Arc::new(Behavior::new());

    session.distance.data_trigger({
        let behavior = Arc::clone(&behavior);
        move |envelope| match Channel::from_stamp(envelope.sender_stamp) {
            Channel::Primary => behavior.set_front_distance(envelope.message),
            Channel::Secondary => behavior.set_rear_distance(envelope.message),
        }
    });
    session.voltage.data_trigger({
        let behavior = Arc::clone(&behavior);
        move |envelope| match Channel::from_stamp(envelope.sender_stamp) {
            Channel::Primary => behavior.set_left_voltage(envelope.message),
            Channel::Secondary => behavior.set_right_voltage(envelope.message),
        }
    });

    let session = session.clone();
    let dt = params.dt();
    let mut elapsed = 0.0_f32;

    info!(cid = session.cid(), frequency = params.frequency, "Behavior loop starting");
    time_trigger("behavior", params.frequency, move || {
        if stop.load(Ordering::Relaxed) {
            return false;
        }

        behavior.step(&params);
        let ground_steering = behavior.steering_command();
        let pedal_position = behavior.pedal_command();

        elapsed += dt;
        let (wheel_left, wheel_right) = profile.speeds_at(elapsed);

        let sample_time = SystemTime::now();
        session.ground_steering.publish(ground_steering, sample_time, STAMP_ACTUATION);
        session.pedal_position.publish(pedal_position, sample_time, STAMP_ACTUATION);
        session.wheel_speed.publish(wheel_left, sample_time, STAMP_LEFT);
        session.wheel_speed.publish(wheel_right, sample_time, STAMP_RIGHT);

        if verbose {
            info!(
                ground_steering = ground_steering.ground_steering,
                pedal_position = pedal_position.position,
                wheel_speed_left = wheel_left.wheel_speed,
                wheel_speed_right = wheel_right.wheel_speed,
                mode = ?behavior.mode(),
                "Published actuation"
            );
        } else {
            debug!(
                ground_steering = ground_steering.ground_steering,
                pedal_position = pedal_position.position,
                "Published actuation"
            );
        }
        true
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiwi_behavior::{ir_voltage_to_distance, wall_correction};
    use kiwi_core::messages::{DistanceReading, STAMP_FRONT, STAMP_REAR, VoltageReading};
    use std::time::Duration;

    fn params() -> BehaviorParams {
        BehaviorParams {
            forward_speed: 0.2,
            front_stop_distance: 0.3,
            rear_stop_distance: 0.2,
            wall_goal_distance: 0.2,
            wall_detect_distance: 0.3,
            reverse_time_limit: 0.05,
            ground_steering: 0.05,
            wall_gain: 0.5,
            reverse_speed: 0.1,
            add_angle_after_reverse: 0.3,
            forward_time_after_reverse_limit: 0.05,
            frequency: 100.0,
        }
    }

    fn profile() -> WheelSpeedProfile {
        WheelSpeedProfile { v0: 0.5, t1: 3.0, t2: 10.0 }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_front_stamp_routes_to_front_sensor() {
        let p = params();
        let session = Session::new(111);
        let mut pedal_rx = session.pedal_position.subscribe();
        let stop = Arc::new(AtomicBool::new(false));

        let handle = spawn(&session, p, profile(), false, Arc::clone(&stop)).unwrap();

        // Obstacle ahead, clear behind. Swapped routing would see a close rear
        // and keep the pedal forward.
        let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
        loop {
            session.distance.publish(DistanceReading { distance: 0.1 }, SystemTime::now(), STAMP_FRONT);
            session.distance.publish(DistanceReading { distance: 2.0 }, SystemTime::now(), STAMP_REAR);
            let Ok(envelope) = tokio::time::timeout_at(deadline, pedal_rx.recv()).await.unwrap() else {
                continue;
            };
            assert_eq!(envelope.sender_stamp, STAMP_ACTUATION);
            if envelope.message.position == -p.reverse_speed {
                break;
            }
        }

        let mut wheel_rx = session.wheel_speed.subscribe();
        let first = wheel_rx.recv().await.unwrap();
        let second = wheel_rx.recv().await.unwrap();
        assert_ne!(first.sender_stamp, second.sender_stamp);

        stop.store(true, Ordering::Relaxed);
        tokio::task::spawn_blocking(move || handle.join()).await.unwrap().unwrap();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_left_stamp_routes_to_left_ir() {
        let p = params();
        let session = Session::new(113);
        let mut steering_rx = session.ground_steering.subscribe();
        let stop = Arc::new(AtomicBool::new(false));

        // A wall on the left only. The opposite routing gives the mirrored
        // correction, so only the left reading can produce this angle.
        let wall_voltage = 1.6;
        let expected = p.ground_steering
            - wall_correction(ir_voltage_to_distance(wall_voltage), ir_voltage_to_distance(0.0), &p) as f32;
        assert!(expected < 0.0);

        let handle = spawn(&session, p, profile(), false, Arc::clone(&stop)).unwrap();

        let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
        loop {
            session.distance.publish(DistanceReading { distance: 2.0 }, SystemTime::now(), STAMP_FRONT);
            session.distance.publish(DistanceReading { distance: 2.0 }, SystemTime::now(), STAMP_REAR);
            session.voltage.publish(VoltageReading { voltage: wall_voltage }, SystemTime::now(), STAMP_LEFT);
            session.voltage.publish(VoltageReading { voltage: 0.0 }, SystemTime::now(), STAMP_RIGHT);
            let Ok(envelope) = tokio::time::timeout_at(deadline, steering_rx.recv()).await.unwrap() else {
                continue;
            };
            if envelope.message.ground_steering == expected {
                break;
            }
        }

        stop.store(true, Ordering::Relaxed);
        tokio::task::spawn_blocking(move || handle.join()).await.unwrap().unwrap();
    }
}
