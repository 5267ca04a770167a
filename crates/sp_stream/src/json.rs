//! Bridge between the event protocol and [`serde_json::Value`].
//!
//! [`emit_value`] plays a parsed document as events, standing in for a
//! tokenizer; [`ValueBuilder`] collects events back into a document.
//!
//! ```
//! use serde_json::json;
//! use sp_stream::json::{ValueBuilder, emit_value};
//!
//! let doc = json!({ "a": [1, 2.5, null], "b": { "c": "text" } });
//!
//! let mut builder = ValueBuilder::new();
//! emit_value(&doc, &mut builder)?;
//! assert_eq!(builder.finish()?, doc);
//! # Ok::<(), sp_stream::StreamError>(())
//! ```

use alloc::string::String;
use alloc::vec::Vec;

use serde_json::{Map, Value};

use crate::{Container, Nesting, Number, StreamConsumer, StreamError, StructuralError};

// -----------------------------------------------------------------------------
// Emitting

/// Sends `value` as one well-formed event sequence.
///
/// Unsigned integers above `i64::MAX` are delivered as floats.
pub fn emit_value<C: StreamConsumer + ?Sized>(
    value: &Value,
    consumer: &mut C,
) -> Result<(), StreamError> {
    match value {
        Value::Null => consumer.null_value(),
        Value::Bool(v) => consumer.bool_value(*v),
        Value::Number(n) => consumer.number_value(to_number(n)),
        Value::String(s) => consumer.string_value(s),
        Value::Array(items) => {
            consumer.open_array()?;
            for item in items {
                emit_value(item, consumer)?;
            }
            consumer.close_array()
        }
        Value::Object(map) => {
            consumer.open_object()?;
            for (key, item) in map {
                consumer.key(key)?;
                emit_value(item, consumer)?;
            }
            consumer.close_object()
        }
    }
}

fn to_number(n: &serde_json::Number) -> Number {
    match n.as_i64() {
        Some(v) => Number::Int(v),
        None => Number::Float(n.as_f64().unwrap_or(f64::NAN)),
    }
}

// -----------------------------------------------------------------------------
// Building

enum Partial {
    Array(Vec<Value>),
    Object(Map<String, Value>, Option<String>),
}

/// A consumer that materializes the stream as a [`Value`].
///
/// Non-finite floats have no JSON form and become `null`. Structure is
/// checked as events arrive.
#[derive(Default)]
pub struct ValueBuilder {
    nesting: Nesting,
    stack: Vec<Partial>,
    root: Option<Value>,
}

impl ValueBuilder {
    #[inline]
    pub const fn new() -> Self {
        Self {
            nesting: Nesting::new(),
            stack: Vec::new(),
            root: None,
        }
    }

    /// Returns the completed document.
    pub fn finish(self) -> Result<Value, StreamError> {
        self.nesting.finish()?;
        self.root.ok_or(StreamError::Structural(StructuralError::Empty))
    }

    fn push(&mut self, value: Value) {
        match self.stack.last_mut() {
            None => self.root = Some(value),
            Some(Partial::Array(items)) => items.push(value),
            Some(Partial::Object(map, key)) => {
                if let Some(key) = key.take() {
                    map.insert(key, value);
                }
            }
        }
    }

    fn scalar(&mut self, event: &'static str, value: Value) -> Result<(), StreamError> {
        self.nesting.value(event)?;
        self.push(value);
        Ok(())
    }
}

impl StreamConsumer for ValueBuilder {
    fn open_object(&mut self) -> Result<(), StreamError> {
        self.nesting.open(Container::Object)?;
        self.stack.push(Partial::Object(Map::new(), None));
        Ok(())
    }

    fn close_object(&mut self) -> Result<(), StreamError> {
        self.nesting.close(Container::Object)?;
        if let Some(Partial::Object(map, _)) = self.stack.pop() {
            self.push(Value::Object(map));
        }
        Ok(())
    }

    fn open_array(&mut self) -> Result<(), StreamError> {
        self.nesting.open(Container::Array)?;
        self.stack.push(Partial::Array(Vec::new()));
        Ok(())
    }

    fn close_array(&mut self) -> Result<(), StreamError> {
        self.nesting.close(Container::Array)?;
        if let Some(Partial::Array(items)) = self.stack.pop() {
            self.push(Value::Array(items));
        }
        Ok(())
    }

    fn key(&mut self, name: &str) -> Result<(), StreamError> {
        self.nesting.key(name)?;
        if let Some(Partial::Object(_, key)) = self.stack.last_mut() {
            *key = Some(name.into());
        }
        Ok(())
    }

    fn null_value(&mut self) -> Result<(), StreamError> {
        self.scalar("null_value", Value::Null)
    }

    fn bool_value(&mut self, value: bool) -> Result<(), StreamError> {
        self.scalar("bool_value", Value::Bool(value))
    }

    fn number_value(&mut self, value: Number) -> Result<(), StreamError> {
        let value = match value {
            Number::Int(v) => Value::from(v),
            Number::Float(v) => serde_json::Number::from_f64(v).map_or(Value::Null, Value::Number),
        };
        self.scalar("number_value", value)
    }

    fn string_value(&mut self, value: &str) -> Result<(), StreamError> {
        self.scalar("string_value", Value::String(value.into()))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{ValueBuilder, emit_value};
    use crate::{Event, EventBuffer, Number, StreamConsumer, StreamError, StructuralError};

    #[test]
    fn emits_in_document_order() {
        let mut buffer = EventBuffer::new();
        emit_value(&json!({ "k": [true, -1] }), &mut buffer).unwrap();
        assert_eq!(
            buffer.events(),
            &[
                Event::OpenObject,
                Event::Key("k".into()),
                Event::OpenArray,
                Event::Bool(true),
                Event::Number(Number::Int(-1)),
                Event::CloseArray,
                Event::CloseObject,
            ]
        );
    }

    #[test]
    fn large_unsigned_becomes_float() {
        let mut buffer = EventBuffer::new();
        emit_value(&json!(u64::MAX), &mut buffer).unwrap();
        assert!(matches!(buffer.events(), [Event::Number(Number::Float(_))]));
    }

    #[test]
    fn non_finite_floats_become_null() {
        let mut builder = ValueBuilder::new();
        builder.open_array().unwrap();
        builder.number_value(Number::Float(f64::NAN)).unwrap();
        builder.number_value(Number::Float(0.5)).unwrap();
        builder.close_array().unwrap();
        assert_eq!(builder.finish().unwrap(), json!([null, 0.5]));
    }

    #[test]
    fn builder_checks_structure() {
        let mut builder = ValueBuilder::new();
        builder.open_object().unwrap();
        assert!(builder.close_array().is_err());

        assert_eq!(
            ValueBuilder::new().finish(),
            Err(StreamError::Structural(StructuralError::Empty))
        );
    }
}
