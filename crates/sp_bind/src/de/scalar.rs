//! Scalar conversion per descriptor kind.

use core::any::Any;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;
use sp_policy::{Bounds, Coercion, CoercionFailure, Elide};
use sp_policy::{coerce_decimal, coerce_decimal_to_integer, coerce_integer};
use sp_stream::{Number, ScalarRef};

use crate::descriptor::{Descriptor, EnumKind, Kind};

/// Converts a non-null scalar into a value of `descriptor`'s type.
///
/// Returns the value together with the degenerate conditions it holds.
/// Wrappers must be peeled before.
pub(crate) fn convert(
    descriptor: &Descriptor,
    scalar: ScalarRef<'_>,
    coercion: Coercion,
) -> Result<(Box<dyn Any>, Elide), CoercionFailure> {
    let mut held = Elide::empty();
    let value: Box<dyn Any> = match descriptor.kind() {
        Kind::Bool => {
            let flag = to_bool(scalar, coercion)?;
            held.set(Elide::FALSE, !flag);
            Box::new(flag)
        }
        Kind::Integer(kind) => {
            let number = to_integer(scalar, kind.bounds(), coercion)?;
            held.set(Elide::ZERO_INTEGRAL, number == 0);
            kind.make(number).ok_or(CoercionFailure::OutOfRange {
                value: number as f64,
                min: kind.natural().min as f64,
                max: kind.natural().max as f64,
            })?
        }
        Kind::Decimal(kind) => {
            let number = to_decimal(scalar, coercion)?;
            let number = coerce_decimal(number, kind.range_for(number), coercion)?;
            held.set(Elide::ZERO_DECIMAL, number == 0.0);
            held.set(Elide::INFINITE, number.is_infinite());
            held.set(Elide::NAN, number.is_nan());
            kind.make(number)
        }
        Kind::String => {
            let text = to_string(scalar, coercion)?;
            held.set(Elide::EMPTY_STRING, text.is_empty());
            held.set(Elide::BLANK_STRING, text.trim().is_empty());
            Box::new(text)
        }
        Kind::Bytes => {
            let ScalarRef::Str(text) = scalar else {
                return Err(CoercionFailure::mismatch("base64 string", scalar.kind_name()));
            };
            let bytes = STANDARD
                .decode(text)
                .map_err(|_| CoercionFailure::mismatch("base64 string", "string"))?;
            held.set(Elide::EMPTY_ARRAY, bytes.is_empty());
            Box::new(Bytes::from(bytes))
        }
        Kind::Enum(kind) => {
            let (value, conditions) = to_enum(kind, scalar)?;
            held = conditions;
            value
        }
        Kind::Adapter(adapter) => {
            let value = adapter.parse(scalar, coercion)?;
            held = adapter.conditions(&*value);
            value
        }
        kind => return Err(CoercionFailure::mismatch(kind.name(), scalar.kind_name())),
    };
    Ok((value, held))
}

fn to_bool(scalar: ScalarRef<'_>, coercion: Coercion) -> Result<bool, CoercionFailure> {
    match scalar {
        ScalarRef::Bool(flag) => Ok(flag),
        ScalarRef::Str(text) if coercion.contains(Coercion::STRING_TO_BOOLEAN) => {
            let text = text.trim();
            if text.eq_ignore_ascii_case("true") {
                Ok(true)
            } else if text.eq_ignore_ascii_case("false") {
                Ok(false)
            } else {
                Err(CoercionFailure::mismatch("boolean", "string"))
            }
        }
        other => Err(CoercionFailure::mismatch("boolean", other.kind_name())),
    }
}

fn to_integer(
    scalar: ScalarRef<'_>,
    bounds: Bounds<i64>,
    coercion: Coercion,
) -> Result<i64, CoercionFailure> {
    match scalar {
        ScalarRef::Number(Number::Int(number)) => coerce_integer(number, bounds, coercion),
        ScalarRef::Number(Number::Float(number)) => coerce_decimal_to_integer(number, bounds, coercion),
        ScalarRef::Bool(flag) if coercion.contains(Coercion::BOOLEAN_TO_NUMBER) => {
            coerce_integer(i64::from(flag), bounds, coercion)
        }
        ScalarRef::Str(text) if coercion.contains(Coercion::STRING_TO_NUMBER) => match parse_number(text) {
            Some(number) => to_integer(ScalarRef::Number(number), bounds, coercion),
            None => Err(CoercionFailure::mismatch("integer", "string")),
        },
        other => Err(CoercionFailure::mismatch("integer", other.kind_name())),
    }
}

fn to_decimal(scalar: ScalarRef<'_>, coercion: Coercion) -> Result<f64, CoercionFailure> {
    match scalar {
        ScalarRef::Number(number) => Ok(number.as_f64()),
        ScalarRef::Bool(flag) if coercion.contains(Coercion::BOOLEAN_TO_NUMBER) => {
            Ok(f64::from(u8::from(flag)))
        }
        ScalarRef::Str(text) if coercion.contains(Coercion::STRING_TO_NUMBER) => match parse_number(text) {
            Some(number) => Ok(number.as_f64()),
            None => Err(CoercionFailure::mismatch("decimal", "string")),
        },
        other => Err(CoercionFailure::mismatch("decimal", other.kind_name())),
    }
}

fn to_string(scalar: ScalarRef<'_>, coercion: Coercion) -> Result<String, CoercionFailure> {
    match scalar {
        ScalarRef::Str(text) => Ok(text.to_owned()),
        ScalarRef::Number(number) if coercion.contains(Coercion::NUMBER_TO_STRING) => {
            Ok(number.to_string())
        }
        other => Err(CoercionFailure::mismatch("string", other.kind_name())),
    }
}

/// Unknown names fall back to the default constant and hold `OUT_ENUM`.
fn to_enum(kind: &EnumKind, scalar: ScalarRef<'_>) -> Result<(Box<dyn Any>, Elide), CoercionFailure> {
    let ScalarRef::Str(name) = scalar else {
        return Err(CoercionFailure::mismatch("constant name", scalar.kind_name()));
    };
    let (index, held) = match (kind.index_of_name(name), kind.default_index()) {
        (Some(index), default) if default == Some(index) => (index, Elide::DEFAULT_ENUM),
        (Some(index), _) => (index, Elide::empty()),
        (None, Some(default)) => (default, Elide::OUT_ENUM),
        (None, None) => return Err(CoercionFailure::mismatch("declared constant", "string")),
    };
    let value = kind
        .make(index)
        .ok_or(CoercionFailure::mismatch("declared constant", "string"))?;
    Ok((value, held))
}

/// Reads decimal text as an integer when possible.
fn parse_number(text: &str) -> Option<Number> {
    let text = text.trim();
    if let Ok(number) = text.parse::<i64>() {
        return Some(Number::Int(number));
    }
    text.parse::<f64>().ok().map(Number::Float)
}

#[cfg(test)]
mod tests {
    use sp_policy::{Bounds, Coercion, CoercionFailure};
    use sp_stream::{Number, ScalarRef};

    use super::{parse_number, to_bool, to_decimal, to_integer, to_string};

    const PERCENT: Bounds<i64> = Bounds::new(0, 100);

    #[test]
    fn integers_follow_coercion_flags() {
        let over = ScalarRef::Number(Number::Int(150));
        assert_eq!(to_integer(over, PERCENT, Coercion::APPLY_CLAMP), Ok(100));
        assert!(to_integer(over, PERCENT, Coercion::empty()).is_err());

        let flag = ScalarRef::Bool(true);
        assert!(to_integer(flag, PERCENT, Coercion::empty()).is_err());
        assert_eq!(to_integer(flag, PERCENT, Coercion::BOOLEAN_TO_NUMBER), Ok(1));
    }

    #[test]
    fn text_is_redispatched_as_a_number() {
        let text = ScalarRef::Str(" 42.7 ");
        assert!(to_integer(text, PERCENT, Coercion::STRING_TO_NUMBER).is_err());
        let rounded = Coercion::STRING_TO_NUMBER | Coercion::APPLY_ROUND_NEAREST;
        assert_eq!(to_integer(text, PERCENT, rounded), Ok(43));
        assert_eq!(to_decimal(text, Coercion::STRING_TO_NUMBER), Ok(42.7));
        assert_eq!(parse_number("7"), Some(Number::Int(7)));
        assert_eq!(parse_number("seven"), None);
    }

    #[test]
    fn strings_and_booleans() {
        let number = ScalarRef::Number(Number::Float(2.5));
        assert!(matches!(
            to_string(number, Coercion::empty()),
            Err(CoercionFailure::Mismatch { .. })
        ));
        assert_eq!(to_string(number, Coercion::NUMBER_TO_STRING).unwrap(), "2.5");

        let text = ScalarRef::Str("TRUE");
        assert!(to_bool(text, Coercion::empty()).is_err());
        assert_eq!(to_bool(text, Coercion::STRING_TO_BOOLEAN), Ok(true));
    }
}
