//! Shared plumbing for the Kiwi controller and plant model.
//!
//! - [`messages`]: the records carried on the bus and the sender-stamp convention
//! - [`guarded`]: one lock per readable/writable field
//! - [`bus`]: in-process publish/subscribe session and the periodic tick driver
//! - [`config`]: TOML settings loading

pub mod bus;
pub mod config;
pub mod error;
pub mod guarded;
pub mod messages;

pub use bus::{Envelope, Session, Topic, time_trigger};
pub use error::{KiwiError, Result};
pub use guarded::Guarded;
