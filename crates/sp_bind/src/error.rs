use alloc::borrow::Cow;
use core::any::{Any, type_name};

use thiserror::Error;

/// A failed accessor, build strategy or wrapper operation.
///
/// Never fatal: the serializer omits the property, the parser skips the
/// value, and both log the failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AccessError {
    #[error("expected a value of type `{expected}`")]
    TypeMismatch { expected: &'static str },

    #[error("`{0}` has no build strategy")]
    NoBuildStrategy(&'static str),

    #[error("`{0}` cannot be taken out of its owner")]
    NotTakeable(&'static str),

    #[error("`{0}` is shared and cannot be unwrapped")]
    Shared(&'static str),

    #[error("`{0}` is mutably borrowed")]
    Borrowed(&'static str),

    #[error("{0}")]
    Custom(Cow<'static, str>),
}

impl AccessError {
    #[inline]
    pub fn custom(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Custom(message.into())
    }

    #[inline]
    pub fn mismatch<T: ?Sized>() -> Self {
        Self::TypeMismatch {
            expected: type_name::<T>(),
        }
    }
}

// -----------------------------------------------------------------------------
// Downcasting

#[inline]
pub(crate) fn downcast_ref<T: Any>(value: &dyn Any) -> Result<&T, AccessError> {
    value.downcast_ref::<T>().ok_or_else(AccessError::mismatch::<T>)
}

#[inline]
pub(crate) fn downcast_mut<T: Any>(value: &mut dyn Any) -> Result<&mut T, AccessError> {
    value.downcast_mut::<T>().ok_or_else(AccessError::mismatch::<T>)
}

#[inline]
pub(crate) fn downcast_box<T: Any>(value: Box<dyn Any>) -> Result<Box<T>, AccessError> {
    value.downcast::<T>().map_err(|_| AccessError::mismatch::<T>())
}
