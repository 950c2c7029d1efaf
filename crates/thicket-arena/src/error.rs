//! Arena-specific error types.

use std::error::Error;
use std::fmt;

/// Errors reported while constructing arena structures.
///
/// Runtime operations never fail: exhaustion and bad indices are
/// preconditions, not errors. Only configuration and layout mismatches
/// discovered at construction time are reported.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArenaError {
    /// A configuration value is out of range.
    InvalidConfig {
        /// Human-readable description.
        reason: String,
    },
    /// A typed view was requested for an element whose size does not
    /// match the list's stride.
    StrideMismatch {
        /// Stride recorded in the list header, in bytes.
        expected: u32,
        /// Size of the requested element type, in bytes.
        actual: u32,
    },
}

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfig { reason } => write!(f, "invalid arena config: {reason}"),
            Self::StrideMismatch { expected, actual } => {
                write!(
                    f,
                    "stride mismatch: list stores {expected}-byte elements, type is {actual} bytes"
                )
            }
        }
    }
}

impl Error for ArenaError {}
