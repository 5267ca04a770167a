use crate::{Container, Nesting, Number, StreamConsumer, StreamError};

/// Rejects malformed event sequences before they reach `inner`.
///
/// Every event is checked with [`Nesting`] first and only forwarded when
/// it keeps the stream well formed.
///
/// ```
/// use sp_stream::{EventBuffer, StreamConsumer, StreamError, StructuralError, Validator};
///
/// let mut checked = Validator::new(EventBuffer::new());
/// checked.open_array()?;
/// let err = checked.close_object().unwrap_err();
/// assert_eq!(
///     err,
///     StreamError::from(StructuralError::MismatchedClose { found: "close_object", open: "array" }),
/// );
/// # Ok::<(), StreamError>(())
/// ```
#[derive(Debug, Default)]
pub struct Validator<C> {
    inner: C,
    nesting: Nesting,
}

impl<C: StreamConsumer> Validator<C> {
    #[inline]
    pub const fn new(inner: C) -> Self {
        Self {
            inner,
            nesting: Nesting::new(),
        }
    }

    /// Returns the wrapped consumer without checking completeness.
    #[inline]
    pub fn into_inner(self) -> C {
        self.inner
    }

    #[inline]
    pub fn inner(&self) -> &C {
        &self.inner
    }

    /// Returns the wrapped consumer once exactly one value was forwarded.
    pub fn finish(self) -> Result<C, StreamError> {
        self.nesting.finish()?;
        Ok(self.inner)
    }
}

impl<C: StreamConsumer> StreamConsumer for Validator<C> {
    fn open_object(&mut self) -> Result<(), StreamError> {
        self.nesting.open(Container::Object)?;
        self.inner.open_object()
    }

    fn close_object(&mut self) -> Result<(), StreamError> {
        self.nesting.close(Container::Object)?;
        self.inner.close_object()
    }

    fn open_array(&mut self) -> Result<(), StreamError> {
        self.nesting.open(Container::Array)?;
        self.inner.open_array()
    }

    fn close_array(&mut self) -> Result<(), StreamError> {
        self.nesting.close(Container::Array)?;
        self.inner.close_array()
    }

    fn key(&mut self, name: &str) -> Result<(), StreamError> {
        self.nesting.key(name)?;
        self.inner.key(name)
    }

    fn null_value(&mut self) -> Result<(), StreamError> {
        self.nesting.value("null_value")?;
        self.inner.null_value()
    }

    fn bool_value(&mut self, value: bool) -> Result<(), StreamError> {
        self.nesting.value("bool_value")?;
        self.inner.bool_value(value)
    }

    fn number_value(&mut self, value: Number) -> Result<(), StreamError> {
        self.nesting.value("number_value")?;
        self.inner.number_value(value)
    }

    fn string_value(&mut self, value: &str) -> Result<(), StreamError> {
        self.nesting.value("string_value")?;
        self.inner.string_value(value)
    }
}

#[cfg(test)]
mod tests {
    use super::Validator;
    use crate::{Event, EventBuffer, StreamConsumer, StreamError, StructuralError};

    #[test]
    fn forwards_well_formed_events() {
        let mut v = Validator::new(EventBuffer::new());
        v.open_object().unwrap();
        v.key("a").unwrap();
        v.bool_value(true).unwrap();
        v.close_object().unwrap();

        let buffer = v.finish().unwrap();
        assert_eq!(
            buffer.events(),
            &[
                Event::OpenObject,
                Event::Key("a".into()),
                Event::Bool(true),
                Event::CloseObject,
            ]
        );
    }

    #[test]
    fn rejected_events_are_not_forwarded() {
        let mut v = Validator::new(EventBuffer::new());
        v.open_object().unwrap();
        assert_eq!(
            v.string_value("x"),
            Err(StreamError::Structural(StructuralError::MissingKey(
                "string_value"
            )))
        );
        assert_eq!(v.inner().len(), 1);
        assert_eq!(
            v.finish().unwrap_err(),
            StreamError::Structural(StructuralError::Unclosed(1))
        );
    }
}
