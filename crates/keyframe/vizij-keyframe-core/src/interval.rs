//! Current-interval cache: the pair of anchors that brackets the effective
//! progress, plus the interpolation resolved for that pair.
//!
//! Bracket selection (lower bound = first keyframe with progress >= p):
//! - before the first keyframe: the first two keyframes when the first sits
//!   at 0 and there are at least two, else `(0, default) -> first`
//! - past the last keyframe: the last two keyframes when the last sits at 1
//!   and there are at least two, else `last -> (1, default)`
//! - otherwise: the keyframe before the lower bound and the lower bound

use crate::interp::{InterpRegistry, Interpolation};
use crate::keyframes::{Keyframe, KeyframeTable};
use crate::value::Value;

/// One end of the current interval.
#[derive(Clone, Debug, PartialEq)]
pub struct IntervalEdge {
    pub progress: f64,
    /// `None` when synthesized from an unset default value.
    pub value: Option<Value>,
    /// True when the edge comes from the default start/end value rather than a keyframe.
    pub synthesized: bool,
}

impl IntervalEdge {
    fn keyframe(k: &Keyframe) -> Self {
        Self {
            progress: k.progress,
            value: Some(k.value.clone()),
            synthesized: false,
        }
    }

    fn synthesized(progress: f64, default: Option<&Value>) -> Self {
        Self {
            progress,
            value: default.cloned(),
            synthesized: true,
        }
    }
}

/// Anchors available for interpolation: keyframes plus the default value if set.
#[inline]
pub fn anchor_count(table: &KeyframeTable, default: Option<&Value>) -> usize {
    table.len() + usize::from(default.is_some())
}

/// Pick the bracketing edges for `progress`. `None` if the table is empty.
pub fn select_bracket(
    table: &KeyframeTable,
    default: Option<&Value>,
    progress: f64,
) -> Option<(IntervalEdge, IntervalEdge)> {
    let n = table.len();
    let first = table.first()?;
    let last = table.last()?;
    let idx = table.lower_bound(progress);

    let pair = if idx == 0 {
        if first.progress == 0.0 && n > 1 {
            (IntervalEdge::keyframe(first), IntervalEdge::keyframe(table.get(1)?))
        } else {
            (
                IntervalEdge::synthesized(0.0, default),
                IntervalEdge::keyframe(first),
            )
        }
    } else if idx == n {
        if last.progress == 1.0 && n > 1 {
            (IntervalEdge::keyframe(table.get(n - 2)?), IntervalEdge::keyframe(last))
        } else {
            (
                IntervalEdge::keyframe(last),
                IntervalEdge::synthesized(1.0, default),
            )
        }
    } else {
        (
            IntervalEdge::keyframe(table.get(idx - 1)?),
            IntervalEdge::keyframe(table.get(idx)?),
        )
    };
    Some(pair)
}

/// Cached bracket with its resolved interpolation.
#[derive(Clone, Debug)]
pub struct CurrentInterval {
    pub start: IntervalEdge,
    pub end: IntervalEdge,
    pub interpolation: Interpolation,
}

impl CurrentInterval {
    /// Bracket `progress` and resolve the interpolation for the edge kinds.
    pub fn bracket(
        table: &KeyframeTable,
        default: Option<&Value>,
        progress: f64,
        registry: &InterpRegistry,
    ) -> Option<Self> {
        let (start, end) = select_bracket(table, default, progress)?;
        let interpolation = match (&start.value, &end.value) {
            (Some(a), Some(b)) => registry.resolve(&a.kind(), &b.kind()),
            _ => Interpolation::Noop,
        };
        Some(Self {
            start,
            end,
            interpolation,
        })
    }

    /// Whether `progress` has left this bracket. Edges at 0 and 1 never
    /// expire, so extrapolating easing keeps using the outermost interval.
    #[inline]
    pub fn needs_rebracket(&self, progress: f64) -> bool {
        (self.start.progress > 0.0 && progress < self.start.progress)
            || (self.end.progress < 1.0 && progress > self.end.progress)
    }

    /// Map `progress` into this interval's local [0, 1] range.
    ///
    /// A zero-width interval (a keyframe sitting on the same edge as the
    /// synthesized default) maps onto the keyframe's side.
    #[inline]
    pub fn local_progress(&self, progress: f64) -> f64 {
        let width = self.end.progress - self.start.progress;
        if width == 0.0 {
            if self.end.synthesized {
                0.0
            } else {
                1.0
            }
        } else {
            (progress - self.start.progress) / width
        }
    }

    /// Both edge values, if neither is absent.
    #[inline]
    pub fn values(&self) -> Option<(&Value, &Value)> {
        Some((self.start.value.as_ref()?, self.end.value.as_ref()?))
    }
}
