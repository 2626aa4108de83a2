use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use std::time::SystemTime;

use tracing::{debug, info};

use kiwi_core::messages::{Channel, STAMP_ACTUATION};
use kiwi_core::{Session, time_trigger};
use kiwi_sim::SingleTrackModel;

/// Wire a [`SingleTrackModel`] to the session and integrate it at `freq` Hz.
///
/// Wheel-speed requests stamped 0 drive the left wheel, any other stamp the
/// right one. Each tick publishes the new kinematic state.
pub fn spawn(
    session: &Session,
    freq: f32,
    verbose: bool,
    stop: Arc<AtomicBool>,
) -> kiwi_core::Result<JoinHandle<()>> {
    let model = Arc::new(SingleTrackModel::new());

    session.wheel_speed.data_trigger({
        let model = Arc::clone(&model);
        move |envelope| match Channel::from_stamp(envelope.sender_stamp) {
            Channel::Primary => model.set_wheel_speed_left(envelope.message),
            Channel::Secondary => model.set_wheel_speed_right(envelope.message),
        }
    });

    let session = session.clone();
    let dt = 1.0 / f64::from(freq);

    info!(cid = session.cid(), freq, "Plant loop starting");
    time_trigger("plant", freq, move || {
        if stop.load(Ordering::Relaxed) {
            return false;
        }

        let state = model.step(dt);
        session.kinematic_state.publish(state, SystemTime::now(), STAMP_ACTUATION);

        if verbose {
            info!(vx = state.vx, vy = state.vy, yaw_rate = state.yaw_rate, "Published kinematic state");
        } else {
            debug!(%state, "Published kinematic state");
        }
        true
    })
}
