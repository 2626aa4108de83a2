#![warn(missing_docs)]

//! Error types for the kinematics library.
//!
//! Integration itself never fails; only constructing a drive with invalid
//! geometry does.

use core::fmt;

/// Errors that can occur while setting up kinematic models.
#[derive(Debug, Clone, PartialEq)]
pub enum KinematicsError {
    /// Error for invalid track radius.
    /// This variant is returned when the half-distance between the wheels is not positive.
    InvalidTrackRadius(&'static str),
}

impl core::fmt::Display for KinematicsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KinematicsError::InvalidTrackRadius(msg) => write!(f, "Invalid track radius: {}", msg),
        }
    }
}

impl core::error::Error for KinematicsError {}
