//! Built-in interpolators:
//! - floats blend linearly, exact at both ends
//! - integers blend as `from + (to - from) * t` and truncate toward zero
//! - geometric aggregates blend component by component, recursing into
//!   their scalar fields (a line blends each endpoint, a rect each edge)
//! - every other kind has no built-in and resolves to the no-op

use crate::geometry::{Line, LineF, Point, PointF, Rect, RectF, Size, SizeF};
use crate::value::{Value, ValueKind};

/// Signature shared by all built-in interpolators.
pub type BuiltinFn = fn(&Value, &Value, f64) -> Option<Value>;

/// Linear blend that is exact at both ends: `t == 0` yields `a`, `t == 1` yields `b`.
#[inline]
pub fn lerp_f64(a: f64, b: f64, t: f64) -> f64 {
    a * (1.0 - t) + b * t
}

/// Linearly interpolate between two values of the same type.
///
/// `t` is usually in [0, 1] but may leave that range with extrapolating
/// easing curves; implementations extrapolate rather than clamp.
pub trait Lerp {
    fn lerp(&self, to: &Self, t: f64) -> Self;
}

macro_rules! impl_lerp_for_integer {
    ($($ty:ty),*) => {
        $(
            impl Lerp for $ty {
                #[inline]
                fn lerp(&self, to: &Self, t: f64) -> Self {
                    // 64-bit endpoints do not survive a round trip through f64.
                    if t == 0.0 {
                        return *self;
                    }
                    if t == 1.0 {
                        return *to;
                    }
                    let from = *self as f64;
                    // `as` truncates toward zero and saturates past the type's range.
                    (from + (*to as f64 - from) * t) as $ty
                }
            }
        )*
    };
}

impl_lerp_for_integer!(i32, u32, i64, u64);

impl Lerp for f32 {
    #[inline]
    fn lerp(&self, to: &Self, t: f64) -> Self {
        lerp_f64(f64::from(*self), f64::from(*to), t) as f32
    }
}

impl Lerp for f64 {
    #[inline]
    fn lerp(&self, to: &Self, t: f64) -> Self {
        lerp_f64(*self, *to, t)
    }
}

macro_rules! impl_lerp_for_struct {
    ($($ty:ident { $($field:ident),+ }),* $(,)?) => {
        $(
            impl Lerp for $ty {
                #[inline]
                fn lerp(&self, to: &Self, t: f64) -> Self {
                    $ty {
                        $($field: self.$field.lerp(&to.$field, t),)+
                    }
                }
            }
        )*
    };
}

impl_lerp_for_struct! {
    Point { x, y },
    PointF { x, y },
    Size { width, height },
    SizeF { width, height },
    Line { p1, p2 },
    LineF { p1, p2 },
    Rect { left, top, right, bottom },
    RectF { x, y, width, height },
}

/// A `Lerp` type that can be read from and written back into a `Value`.
pub trait Interpolable: Lerp + Sized {
    fn from_value(value: &Value) -> Option<&Self>;
    fn into_value(self) -> Value;
}

macro_rules! impl_interpolable {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl Interpolable for $ty {
                #[inline]
                fn from_value(value: &Value) -> Option<&Self> {
                    match value {
                        Value::$variant(v) => Some(v),
                        _ => None,
                    }
                }

                #[inline]
                fn into_value(self) -> Value {
                    Value::$variant(self)
                }
            }
        )*
    };
}

impl_interpolable! {
    i32 => Int,
    u32 => UInt,
    i64 => Long,
    u64 => ULong,
    f32 => Float,
    f64 => Double,
    Point => Point,
    PointF => PointF,
    Size => Size,
    SizeF => SizeF,
    Line => Line,
    LineF => LineF,
    Rect => Rect,
    RectF => RectF,
}

/// Interpolate two values holding a `T` payload; `None` if either payload
/// is of a different kind.
pub fn lerp_variant<T: Interpolable>(from: &Value, to: &Value, t: f64) -> Option<Value> {
    let a = T::from_value(from)?;
    let b = T::from_value(to)?;
    Some(a.lerp(b, t).into_value())
}

/// The fallback used for mismatched or unhandled kinds: always absent.
#[inline]
pub fn noop_value(_from: &Value, _to: &Value, _t: f64) -> Option<Value> {
    None
}

/// Built-in interpolator for `kind`, if any.
pub fn builtin_interpolator(kind: &ValueKind) -> Option<BuiltinFn> {
    let f: BuiltinFn = match kind {
        ValueKind::Int => lerp_variant::<i32>,
        ValueKind::UInt => lerp_variant::<u32>,
        ValueKind::Long => lerp_variant::<i64>,
        ValueKind::ULong => lerp_variant::<u64>,
        ValueKind::Float => lerp_variant::<f32>,
        ValueKind::Double => lerp_variant::<f64>,
        ValueKind::Point => lerp_variant::<Point>,
        ValueKind::PointF => lerp_variant::<PointF>,
        ValueKind::Size => lerp_variant::<Size>,
        ValueKind::SizeF => lerp_variant::<SizeF>,
        ValueKind::Line => lerp_variant::<Line>,
        ValueKind::LineF => lerp_variant::<LineF>,
        ValueKind::Rect => lerp_variant::<Rect>,
        ValueKind::RectF => lerp_variant::<RectF>,
        ValueKind::Bool | ValueKind::Text | ValueKind::Opaque(_) => return None,
    };
    Some(f)
}
