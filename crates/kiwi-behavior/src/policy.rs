//! The control policy: wall following plus the reverse-recovery maneuver.
//!
//! Everything here is lock-free and owns no sensor state; [`Recovery::tick`]
//! maps one sensor snapshot to one command and carries the maneuver state to
//! the next tick.

use tracing::debug;

use crate::params::BehaviorParams;

/// Sensor snapshot for one tick, already converted to distances.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Perception {
    pub front: f32,
    pub rear: f32,
    pub left: f64,
    pub right: f64,
}

/// Actuation produced by one tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Command {
    pub steering: f32,
    pub pedal: f32,
}

/// Driving mode of the controller. The timers count seconds spent in the mode.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DriveMode {
    /// Forward with wall following.
    #[default]
    Normal,
    /// Backing away from a frontal obstacle.
    Reversing { elapsed: f32 },
    /// Driving forward again with the post-reverse nudge applied.
    ForwardAfterReverse { elapsed: f32 },
}

impl DriveMode {
    pub fn is_reversing(&self) -> bool {
        matches!(self, DriveMode::Reversing { .. })
    }
}

/// Proportional wall-follow correction.
///
/// Each side under the detection distance contributes `gain * (goal - distance)`
/// and the result is `left - right`, so two equally distant walls cancel.
pub fn wall_correction(left: f64, right: f64, params: &BehaviorParams) -> f64 {
    let goal = f64::from(params.wall_goal_distance);
    let detect = f64::from(params.wall_detect_distance);
    let gain = f64::from(params.wall_gain);

    let left_correction = if left < detect { gain * (goal - left) } else { 0.0 };
    let right_correction = if right < detect { gain * (goal - right) } else { 0.0 };

    left_correction - right_correction
}

/// Maneuver state persisting across ticks.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Recovery {
    mode: DriveMode,
    /// Steering angle carried between ticks.
    angle: f32,
    /// Nudge picked when the reverse started.
    nudge: f32,
}

impl Recovery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> DriveMode {
        self.mode
    }

    /// Advance one tick.
    ///
    /// The reverse trigger is level-sensitive on the front range and is
    /// checked before the mode runs, so it also cuts a post-reverse drive
    /// short. A rear range under the stop distance forces the pedal forward in
    /// every mode.
    pub fn tick(&mut self, perception: &Perception, params: &BehaviorParams) -> Command {
        if perception.front < params.front_stop_distance {
            self.trigger_reverse(params);
        }

        let mut command = match self.mode {
            DriveMode::Normal => self.drive_normal(perception, params),
            DriveMode::Reversing { elapsed } => self.drive_reverse(elapsed, perception, params),
            DriveMode::ForwardAfterReverse { elapsed } => self.drive_after_reverse(elapsed, params),
        };

        if perception.rear < params.rear_stop_distance {
            command.pedal = params.forward_speed;
        }

        command
    }

    fn trigger_reverse(&mut self, params: &BehaviorParams) {
        match self.mode {
            DriveMode::Reversing { .. } => {}
            DriveMode::ForwardAfterReverse { .. } => {
                self.finish_after_reverse(params);
                self.start_reverse();
            }
            DriveMode::Normal => self.start_reverse(),
        }
    }

    fn start_reverse(&mut self) {
        debug!(angle = self.angle, "Frontal obstacle, reversing");
        self.mode = DriveMode::Reversing { elapsed: 0.0 };
    }

    fn finish_after_reverse(&mut self, params: &BehaviorParams) {
        self.mode = DriveMode::Normal;
        self.angle = params.ground_steering;
    }

    fn drive_normal(&mut self, perception: &Perception, params: &BehaviorParams) -> Command {
        // Saturate: the cubic calibration can exceed the f32 range.
        let correction = wall_correction(perception.left, perception.right, params)
            .clamp(f64::from(f32::MIN), f64::from(f32::MAX)) as f32;
        let steering = params.ground_steering - correction;
        self.angle = steering;

        Command {
            steering,
            pedal: params.forward_speed,
        }
    }

    fn drive_reverse(&mut self, elapsed: f32, perception: &Perception, params: &BehaviorParams) -> Command {
        let dt = params.dt();
        if elapsed < dt {
            self.angle = -self.angle;
            self.nudge = if perception.left > perception.right {
                params.add_angle_after_reverse
            } else {
                -params.add_angle_after_reverse
            };
            debug!(angle = self.angle, nudge = self.nudge, "Reverse started");
        }

        let elapsed = elapsed + dt;
        if elapsed > params.reverse_time_limit {
            debug!(elapsed, "Reverse finished, driving off");
            self.mode = DriveMode::ForwardAfterReverse { elapsed: 0.0 };
        } else {
            self.mode = DriveMode::Reversing { elapsed };
        }

        Command {
            steering: self.angle,
            pedal: -params.reverse_speed,
        }
    }

    fn drive_after_reverse(&mut self, elapsed: f32, params: &BehaviorParams) -> Command {
        let dt = params.dt();
        if elapsed < dt {
            self.angle += self.nudge;
        }
        let steering = self.angle;

        let elapsed = elapsed + dt;
        if elapsed > params.forward_time_after_reverse_limit {
            debug!(elapsed, "Post-reverse nudge finished");
            self.finish_after_reverse(params);
        } else {
            self.mode = DriveMode::ForwardAfterReverse { elapsed };
        }

        Command {
            steering,
            pedal: params.forward_speed,
        }
    }
}
