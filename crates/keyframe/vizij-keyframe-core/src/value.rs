//! Typed keyframe values and their runtime kind tags.
//!
//! `Value` is the payload stored in keyframes and produced by interpolation.
//! An absent value is expressed as `Option<Value>::None` at API boundaries,
//! never as a variant.

use crate::geometry::{Line, LineF, Point, PointF, Rect, RectF, Size, SizeF};
use crate::KeyframeError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Runtime type identifier of a `Value`; the key of the interpolation registry.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    Int,
    UInt,
    Long,
    ULong,
    Float,
    Double,
    Point,
    PointF,
    Size,
    SizeF,
    Line,
    LineF,
    Rect,
    RectF,
    Bool,
    Text,
    /// Host-defined type, identified by name.
    Opaque(String),
}

impl ValueKind {
    /// Shorthand for an opaque kind.
    pub fn opaque(type_name: impl Into<String>) -> Self {
        ValueKind::Opaque(type_name.into())
    }

    pub fn name(&self) -> &str {
        match self {
            ValueKind::Int => "Int",
            ValueKind::UInt => "UInt",
            ValueKind::Long => "Long",
            ValueKind::ULong => "ULong",
            ValueKind::Float => "Float",
            ValueKind::Double => "Double",
            ValueKind::Point => "Point",
            ValueKind::PointF => "PointF",
            ValueKind::Size => "Size",
            ValueKind::SizeF => "SizeF",
            ValueKind::Line => "Line",
            ValueKind::LineF => "LineF",
            ValueKind::Rect => "Rect",
            ValueKind::RectF => "RectF",
            ValueKind::Bool => "Bool",
            ValueKind::Text => "Text",
            ValueKind::Opaque(name) => name,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "data")]
pub enum Value {
    /// 32-bit signed integer
    Int(i32),
    /// 32-bit unsigned integer
    UInt(u32),
    /// 64-bit signed integer
    Long(i64),
    /// 64-bit unsigned integer
    ULong(u64),
    /// Single precision float
    Float(f32),
    /// Double precision float
    Double(f64),
    Point(Point),
    PointF(PointF),
    Size(Size),
    SizeF(SizeF),
    Line(Line),
    LineF(LineF),
    Rect(Rect),
    RectF(RectF),
    /// Boolean; no built-in blending
    Bool(bool),
    /// Text; no built-in blending
    Text(String),
    /// Host-defined payload. Only interpolates through a registered interpolator.
    Opaque {
        type_name: String,
        data: serde_json::Value,
    },
}

impl Value {
    /// Return the runtime kind of this value.
    #[inline]
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Int(_) => ValueKind::Int,
            Value::UInt(_) => ValueKind::UInt,
            Value::Long(_) => ValueKind::Long,
            Value::ULong(_) => ValueKind::ULong,
            Value::Float(_) => ValueKind::Float,
            Value::Double(_) => ValueKind::Double,
            Value::Point(_) => ValueKind::Point,
            Value::PointF(_) => ValueKind::PointF,
            Value::Size(_) => ValueKind::Size,
            Value::SizeF(_) => ValueKind::SizeF,
            Value::Line(_) => ValueKind::Line,
            Value::LineF(_) => ValueKind::LineF,
            Value::Rect(_) => ValueKind::Rect,
            Value::RectF(_) => ValueKind::RectF,
            Value::Bool(_) => ValueKind::Bool,
            Value::Text(_) => ValueKind::Text,
            Value::Opaque { type_name, .. } => ValueKind::Opaque(type_name.clone()),
        }
    }

    /// Whether both values carry the same runtime kind.
    pub fn same_kind(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Opaque { type_name: a, .. }, Value::Opaque { type_name: b, .. }) => a == b,
            _ => core::mem::discriminant(self) == core::mem::discriminant(other),
        }
    }

    pub fn opaque(type_name: impl Into<String>, data: serde_json::Value) -> Self {
        Value::Opaque {
            type_name: type_name.into(),
            data,
        }
    }

    /// Numeric view of scalar values, used by tests and hosts that only
    /// display numbers.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(f64::from(*v)),
            Value::UInt(v) => Some(f64::from(*v)),
            Value::Long(v) => Some(*v as f64),
            Value::ULong(v) => Some(*v as f64),
            Value::Float(v) => Some(f64::from(*v)),
            Value::Double(v) => Some(*v),
            _ => None,
        }
    }
}

macro_rules! impl_value_conversions {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::$variant(value)
                }
            }

            impl TryFrom<Value> for $ty {
                type Error = KeyframeError;

                fn try_from(value: Value) -> Result<Self, Self::Error> {
                    match value {
                        Value::$variant(v) => Ok(v),
                        other => Err(KeyframeError::ValueKindMismatch {
                            expected: ValueKind::$variant,
                            actual: other.kind(),
                        }),
                    }
                }
            }
        )*
    };
}

impl_value_conversions! {
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
    bool => Bool,
    String => Text,
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}
