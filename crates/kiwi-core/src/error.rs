//! Error types for Kiwi startup and wiring

use thiserror::Error;

/// Kiwi error type
///
/// Only setup can fail. Control and plant steps are total over their inputs.
#[derive(Error, Debug)]
pub enum KiwiError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid frequency {0} Hz: must be positive and finite")]
    InvalidFrequency(f32),

    #[error("Failed to spawn thread: {0}")]
    Thread(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, KiwiError>;
