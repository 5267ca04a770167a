use crate::{Number, ScalarRef, StreamError};

/// Receiver of a pushed JSON event stream.
///
/// A well-formed stream describes exactly one value: containers are
/// balanced, every `key` sits directly inside an object and is followed by
/// exactly one value. Implementations may assume well-formedness or check
/// it with [`Nesting`](crate::Nesting); either way a returned error ends
/// the stream and the producer must stop.
///
/// The trait is object safe. Producers in this workspace drive
/// `&mut dyn StreamConsumer`.
///
/// # Examples
///
/// ```
/// use sp_stream::{Number, StreamConsumer, StreamError};
///
/// #[derive(Default)]
/// struct Count(usize);
///
/// impl StreamConsumer for Count {
///     fn open_object(&mut self) -> Result<(), StreamError> { Ok(()) }
///     fn close_object(&mut self) -> Result<(), StreamError> { Ok(()) }
///     fn open_array(&mut self) -> Result<(), StreamError> { Ok(()) }
///     fn close_array(&mut self) -> Result<(), StreamError> { Ok(()) }
///     fn key(&mut self, _: &str) -> Result<(), StreamError> { Ok(()) }
///     fn null_value(&mut self) -> Result<(), StreamError> { self.0 += 1; Ok(()) }
///     fn bool_value(&mut self, _: bool) -> Result<(), StreamError> { self.0 += 1; Ok(()) }
///     fn number_value(&mut self, _: Number) -> Result<(), StreamError> { self.0 += 1; Ok(()) }
///     fn string_value(&mut self, _: &str) -> Result<(), StreamError> { self.0 += 1; Ok(()) }
/// }
///
/// let mut count = Count::default();
/// count.open_array()?;
/// count.number_value(Number::Int(1))?;
/// count.null_value()?;
/// count.close_array()?;
/// assert_eq!(count.0, 2);
/// # Ok::<(), StreamError>(())
/// ```
pub trait StreamConsumer {
    fn open_object(&mut self) -> Result<(), StreamError>;

    fn close_object(&mut self) -> Result<(), StreamError>;

    fn open_array(&mut self) -> Result<(), StreamError>;

    fn close_array(&mut self) -> Result<(), StreamError>;

    /// Names the next value of the enclosing object.
    fn key(&mut self, name: &str) -> Result<(), StreamError>;

    fn null_value(&mut self) -> Result<(), StreamError>;

    fn bool_value(&mut self, value: bool) -> Result<(), StreamError>;

    fn number_value(&mut self, value: Number) -> Result<(), StreamError>;

    fn string_value(&mut self, value: &str) -> Result<(), StreamError>;

    /// Dispatches a scalar to its event method.
    #[inline]
    fn scalar_value(&mut self, value: ScalarRef<'_>) -> Result<(), StreamError> {
        value.feed(self)
    }
}

impl<C: StreamConsumer + ?Sized> StreamConsumer for &mut C {
    #[inline]
    fn open_object(&mut self) -> Result<(), StreamError> {
        (**self).open_object()
    }

    #[inline]
    fn close_object(&mut self) -> Result<(), StreamError> {
        (**self).close_object()
    }

    #[inline]
    fn open_array(&mut self) -> Result<(), StreamError> {
        (**self).open_array()
    }

    #[inline]
    fn close_array(&mut self) -> Result<(), StreamError> {
        (**self).close_array()
    }

    #[inline]
    fn key(&mut self, name: &str) -> Result<(), StreamError> {
        (**self).key(name)
    }

    #[inline]
    fn null_value(&mut self) -> Result<(), StreamError> {
        (**self).null_value()
    }

    #[inline]
    fn bool_value(&mut self, value: bool) -> Result<(), StreamError> {
        (**self).bool_value(value)
    }

    #[inline]
    fn number_value(&mut self, value: Number) -> Result<(), StreamError> {
        (**self).number_value(value)
    }

    #[inline]
    fn string_value(&mut self, value: &str) -> Result<(), StreamError> {
        (**self).string_value(value)
    }
}
