//! Error types for the keyframe engine

use serde::{Deserialize, Serialize};

/// Errors reported by keyframe configuration calls.
///
/// None of these are fatal: a rejected call leaves the engine exactly as it
/// was before the call.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum KeyframeError {
    /// Keyframe progress outside [0, 1] (or NaN)
    #[error("Invalid keyframe progress: {progress} (expected a value in [0, 1])")]
    ProgressOutOfRange { progress: f64 },

    /// Negative animation duration
    #[error("Invalid duration: {duration_ms} ms (duration cannot be negative)")]
    NegativeDuration { duration_ms: i64 },

    /// Value kind mismatch
    #[error("Value kind mismatch: expected {expected}, got {actual}")]
    ValueKindMismatch {
        expected: crate::value::ValueKind,
        actual: crate::value::ValueKind,
    },

    /// Serialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },
}

impl KeyframeError {
    /// Get error category for logging
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::ProgressOutOfRange { .. }
            | Self::NegativeDuration { .. } => "validation",
            Self::ValueKindMismatch { .. } => "value",
            Self::SerializationError { .. } => "serialization",
        }
    }
}

impl From<serde_json::Error> for KeyframeError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError {
            reason: err.to_string(),
        }
    }
}
