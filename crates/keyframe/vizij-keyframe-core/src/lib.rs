//! Vizij Keyframe Core (engine-agnostic)
//!
//! Keyframe interpolation for a single animated property: given keyframes on
//! a normalized [0, 1] timeline, a duration and the host's current time,
//! compute the value to display and notify listeners once per tick.
//!
//! Blending is dispatched by runtime value kind through a shared
//! [`InterpRegistry`]; hosts may register interpolators for their own kinds
//! from any thread.

pub mod animation;
pub mod config;
pub mod easing;
pub mod error;
pub mod geometry;
pub mod interp;
pub mod interval;
pub mod keyframes;
pub mod stored;
pub mod value;

// Re-exports for consumers (adapters)
pub use animation::{CacheState, KeyframeAnimation, ListenerId, RecomputeStats};
pub use config::{AnimationConfig, Direction};
pub use easing::EasingCurve;
pub use error::KeyframeError;
pub use geometry::{Line, LineF, Point, PointF, Rect, RectF, Size, SizeF};
pub use interp::{interpolator, InterpRegistry, Interpolation, Interpolator, SharedInterpolator};
pub use interval::{CurrentInterval, IntervalEdge};
pub use keyframes::{Keyframe, KeyframeTable};
pub use stored::{parse_keyframes_json, to_keyframes_json, KeyframeDocument};
pub use value::{Value, ValueKind};

/// Keyframe engine result type
pub type Result<T> = core::result::Result<T, KeyframeError>;
