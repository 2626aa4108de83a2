use serde::Deserialize;

/// Tuning of the control policy, supplied on every step.
///
/// Distances are in meters, times in seconds. The `[behavior]` section of the
/// settings file carries everything except `frequency`, which always comes from
/// the tick driver so that `dt` matches the real tick period.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct BehaviorParams {
    /// Pedal position while driving forward.
    pub forward_speed: f32,
    /// Front range below which the reverse maneuver starts.
    pub front_stop_distance: f32,
    /// Rear range below which the pedal is forced forward.
    pub rear_stop_distance: f32,
    /// Side distance the wall follower steers towards.
    pub wall_goal_distance: f32,
    /// Side distance below which a wall is considered present.
    pub wall_detect_distance: f32,
    /// How long the reverse maneuver lasts.
    pub reverse_time_limit: f32,
    /// Nominal steering angle, also the forward trim in normal driving.
    pub ground_steering: f32,
    /// Proportional gain of the wall follower.
    pub wall_gain: f32,
    /// Magnitude of the pedal position while reversing.
    pub reverse_speed: f32,
    /// Steering nudge applied when driving off after a reverse.
    pub add_angle_after_reverse: f32,
    /// How long the post-reverse nudge is held.
    pub forward_time_after_reverse_limit: f32,
    /// Control frequency (Hz).
    #[serde(skip_deserializing)]
    pub frequency: f32,
}

impl BehaviorParams {
    /// Tick interval in seconds.
    pub fn dt(&self) -> f32 {
        1.0 / self.frequency
    }

    pub fn with_frequency(mut self, frequency: f32) -> Self {
        self.frequency = frequency;
        self
    }
}
