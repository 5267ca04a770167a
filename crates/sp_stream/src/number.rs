use alloc::string::String;
use core::fmt;

use crate::{StreamConsumer, StreamError};

// -----------------------------------------------------------------------------
// Number

/// A JSON number as delivered by `number_value`.
///
/// Producers keep integers integral; the float case covers every other
/// number, including the non-finite ones a sink may not be able to write.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    #[inline]
    pub const fn is_integral(self) -> bool {
        matches!(self, Number::Int(_))
    }

    /// Returns the value as a float, losing precision for large integers.
    #[inline]
    pub const fn as_f64(self) -> f64 {
        match self {
            Number::Int(v) => v as f64,
            Number::Float(v) => v,
        }
    }

    /// Returns the integer, or a float without fraction that fits an `i64`.
    pub fn as_i64(self) -> Option<i64> {
        match self {
            Number::Int(v) => Some(v),
            Number::Float(v) if v.fract() == 0.0 && v >= i64::MIN as f64 && v < i64::MAX as f64 => {
                Some(v as i64)
            }
            Number::Float(_) => None,
        }
    }
}

impl From<i64> for Number {
    #[inline]
    fn from(value: i64) -> Self {
        Number::Int(value)
    }
}

impl From<i32> for Number {
    #[inline]
    fn from(value: i32) -> Self {
        Number::Int(value as i64)
    }
}

impl From<f64> for Number {
    #[inline]
    fn from(value: f64) -> Self {
        Number::Float(value)
    }
}

impl fmt::Display for Number {
    /// The shortest text that reads back as the same number.
    ///
    /// ```
    /// use sp_stream::Number;
    /// assert_eq!(Number::Int(-7).to_string(), "-7");
    /// assert_eq!(Number::Float(2.5).to_string(), "2.5");
    /// assert_eq!(Number::Float(3.0).to_string(), "3");
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(v) => fmt::Display::fmt(v, f),
            Number::Float(v) => fmt::Display::fmt(v, f),
        }
    }
}

// -----------------------------------------------------------------------------
// Scalar

/// An owned terminal value.
///
/// Used where a scalar outlives the event that carried it: descriptor
/// sentinels and recorded streams.
#[derive(Clone, Debug, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
}

impl Scalar {
    #[inline]
    pub fn as_ref(&self) -> ScalarRef<'_> {
        match self {
            Scalar::Null => ScalarRef::Null,
            Scalar::Bool(v) => ScalarRef::Bool(*v),
            Scalar::Number(v) => ScalarRef::Number(*v),
            Scalar::String(v) => ScalarRef::Str(v),
        }
    }

    /// Sends the value as one scalar event.
    #[inline]
    pub fn feed<C: StreamConsumer + ?Sized>(&self, consumer: &mut C) -> Result<(), StreamError> {
        self.as_ref().feed(consumer)
    }
}

impl From<bool> for Scalar {
    #[inline]
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

impl From<i64> for Scalar {
    #[inline]
    fn from(value: i64) -> Self {
        Scalar::Number(Number::Int(value))
    }
}

impl From<f64> for Scalar {
    #[inline]
    fn from(value: f64) -> Self {
        Scalar::Number(Number::Float(value))
    }
}

impl From<&str> for Scalar {
    #[inline]
    fn from(value: &str) -> Self {
        Scalar::String(value.into())
    }
}

impl From<String> for Scalar {
    #[inline]
    fn from(value: String) -> Self {
        Scalar::String(value)
    }
}

// -----------------------------------------------------------------------------
// ScalarRef

/// A terminal value borrowed from the event that delivered it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScalarRef<'a> {
    Null,
    Bool(bool),
    Number(Number),
    Str(&'a str),
}

impl<'a> ScalarRef<'a> {
    /// Short name of the JSON kind, used in diagnostics.
    pub const fn kind_name(self) -> &'static str {
        match self {
            ScalarRef::Null => "null",
            ScalarRef::Bool(_) => "boolean",
            ScalarRef::Number(Number::Int(_)) => "integer",
            ScalarRef::Number(Number::Float(_)) => "number",
            ScalarRef::Str(_) => "string",
        }
    }

    #[inline]
    pub const fn is_null(self) -> bool {
        matches!(self, ScalarRef::Null)
    }

    pub fn into_owned(self) -> Scalar {
        match self {
            ScalarRef::Null => Scalar::Null,
            ScalarRef::Bool(v) => Scalar::Bool(v),
            ScalarRef::Number(v) => Scalar::Number(v),
            ScalarRef::Str(v) => Scalar::String(v.into()),
        }
    }

    /// Sends the value as one scalar event.
    pub fn feed<C: StreamConsumer + ?Sized>(self, consumer: &mut C) -> Result<(), StreamError> {
        match self {
            ScalarRef::Null => consumer.null_value(),
            ScalarRef::Bool(v) => consumer.bool_value(v),
            ScalarRef::Number(v) => consumer.number_value(v),
            ScalarRef::Str(v) => consumer.string_value(v),
        }
    }
}

impl PartialEq<Scalar> for ScalarRef<'_> {
    fn eq(&self, other: &Scalar) -> bool {
        *self == other.as_ref()
    }
}
