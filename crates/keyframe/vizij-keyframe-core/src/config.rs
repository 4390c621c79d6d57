//! Per-animation configuration for vizij-keyframe-core.

use serde::{Deserialize, Serialize};

/// Default animation duration in milliseconds.
pub const DEFAULT_DURATION_MS: i64 = 250;

/// Playback direction, as reported by the host driver.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

impl Direction {
    /// Progress at which playback in this direction ends.
    #[inline]
    pub fn end_progress(self) -> f64 {
        match self {
            Direction::Forward => 1.0,
            Direction::Backward => 0.0,
        }
    }
}

/// Initial settings for a `KeyframeAnimation`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Duration in milliseconds; negative values are rejected when applied.
    pub duration_ms: i64,
    pub direction: Direction,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            duration_ms: DEFAULT_DURATION_MS,
            direction: Direction::Forward,
        }
    }
}
