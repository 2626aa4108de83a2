use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant, SystemTime};

use spin_sleep::SpinSleeper;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::{KiwiError, Result};
use crate::messages::{
    DistanceReading, GroundSteeringRequest, KinematicState, PedalPositionRequest, VoltageReading,
    WheelSpeedRequest,
};

const TOPIC_CAPACITY: usize = 64;

/// A message as delivered on the bus.
#[derive(Debug, Clone)]
pub struct Envelope<T> {
    pub sample_time: SystemTime,
    /// Discriminates paired channels, see [`crate::messages::Channel`].
    pub sender_stamp: u32,
    pub message: T,
}

/// Broadcast topic with bounded capacity.
/// `T` must be `Send + Sync` because we hop across threads.
#[derive(Debug, Clone)]
pub struct Topic<T> {
    tx: broadcast::Sender<Arc<Envelope<T>>>,
}

impl<T: Send + Sync + 'static> Topic<T> {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Fan the message out to current subscribers. Having none is fine.
    pub fn publish(&self, message: T, sample_time: SystemTime, sender_stamp: u32) {
        let _ = self.tx.send(Arc::new(Envelope {
            sample_time,
            sender_stamp,
            message,
        }));
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Arc<Envelope<T>>> {
        self.tx.subscribe()
    }

    /// Deliver every envelope published from now on to `callback`.
    ///
    /// Runs as a task on the current tokio runtime. Every clone of the topic
    /// keeps it open, so in practice the task lives as long as its session.
    /// A subscriber that falls behind loses the oldest envelopes and keeps going.
    pub fn data_trigger<F>(&self, mut callback: F) -> JoinHandle<()>
    where
        F: FnMut(&Envelope<T>) + Send + 'static,
    {
        let mut rx = self.subscribe();
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(envelope) => callback(&envelope),
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Subscriber lagged behind, oldest messages dropped");
                    }
                    Err(RecvError::Closed) => {
                        debug!("Topic closed, data trigger finished");
                        break;
                    }
                }
            }
        })
    }
}

/// All topics of one Kiwi session, identified by its conference id.
#[derive(Debug, Clone)]
pub struct Session {
    cid: u16,
    pub distance: Topic<DistanceReading>,
    pub voltage: Topic<VoltageReading>,
    pub ground_steering: Topic<GroundSteeringRequest>,
    pub pedal_position: Topic<PedalPositionRequest>,
    pub wheel_speed: Topic<WheelSpeedRequest>,
    pub kinematic_state: Topic<KinematicState>,
}

impl Session {
    pub fn new(cid: u16) -> Self {
        info!(cid, "Opening session");
        Self {
            cid,
            distance: Topic::new(TOPIC_CAPACITY),
            voltage: Topic::new(TOPIC_CAPACITY),
            ground_steering: Topic::new(TOPIC_CAPACITY),
            pedal_position: Topic::new(TOPIC_CAPACITY),
            wheel_speed: Topic::new(TOPIC_CAPACITY),
            kinematic_state: Topic::new(TOPIC_CAPACITY),
        }
    }

    pub fn cid(&self) -> u16 {
        self.cid
    }
}

/// Tick period for a frequency in hertz.
pub fn period(freq: f32) -> Result<Duration> {
    if !freq.is_finite() || freq <= 0.0 {
        return Err(KiwiError::InvalidFrequency(freq));
    }
    Ok(Duration::from_secs_f64(1.0 / f64::from(freq)))
}

/// Call `callback` at `freq` Hz on a dedicated thread until it returns `false`.
///
/// Ticks are scheduled against absolute deadlines; a tick that overruns its
/// slot is followed immediately by the next one instead of bunching up.
pub fn time_trigger<F>(name: &str, freq: f32, mut callback: F) -> Result<thread::JoinHandle<()>>
where
    F: FnMut() -> bool + Send + 'static,
{
    let period = period(freq)?;
    let handle = thread::Builder::new().name(name.into()).spawn(move || {
        let sleeper = SpinSleeper::new(100_000);
        let mut deadline = Instant::now();
        loop {
            if !callback() {
                break;
            }
            deadline += period;
            let now = Instant::now();
            if deadline > now {
                sleeper.sleep(deadline - now);
            } else {
                deadline = now;
            }
        }
    })?;
    info!(name, freq, "Time trigger started");
    Ok(handle)
}
