use alloc::rc::Rc;
use alloc::sync::Arc;
use core::any::{Any, type_name};
use core::cell::RefCell;

use sp_stream::StreamError;

use crate::FieldConfig;
use crate::descriptor::{Bind, TypeHandle};
use crate::error::{AccessError, downcast_box};

/// What a wrapper holds while it is being serialized.
pub enum Peeled<'a> {
    Null,
    Inner(&'a dyn Any),
    Failed(AccessError),
}

/// The pointer or option type around a value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WrapperFlavor {
    /// `Option<T>`: the only flavor that can hold null.
    Nullable,
    /// `Box<T>`
    Boxed,
    /// `Rc<T>` and `Arc<T>`
    Shared,
    /// `RefCell<T>`
    Cell,
}

type Visit = fn(&dyn Any, &mut dyn FnMut(Peeled<'_>) -> Result<(), StreamError>) -> Result<(), StreamError>;

/// A type that adds no structure of its own around another type.
///
/// Declaration-site settings given to a wrapper are passed on to the
/// wrapped type.
#[derive(Clone)]
pub struct WrapperKind {
    inner: TypeHandle,
    flavor: WrapperFlavor,
    config: Option<Arc<FieldConfig>>,
    visit: Visit,
    wrap: fn(Box<dyn Any>) -> Result<Box<dyn Any>, AccessError>,
    unwrap: fn(Box<dyn Any>) -> Result<Option<Box<dyn Any>>, Box<dyn Any>>,
    none: Option<fn() -> Box<dyn Any>>,
}

impl WrapperKind {
    #[inline]
    pub const fn inner(&self) -> &TypeHandle {
        &self.inner
    }

    #[inline]
    pub const fn flavor(&self) -> WrapperFlavor {
        self.flavor
    }

    #[inline]
    pub fn is_nullable(&self) -> bool {
        self.none.is_some()
    }

    /// Settings forwarded to the wrapped type.
    #[inline]
    pub fn config(&self) -> Option<&FieldConfig> {
        self.config.as_deref()
    }

    #[inline]
    pub(crate) fn set_config(&mut self, config: FieldConfig) {
        self.config = Some(Arc::new(config));
    }

    /// Calls `f` with the wrapped value, or with [`Peeled::Null`].
    #[inline]
    pub fn visit(
        &self,
        value: &dyn Any,
        f: &mut dyn FnMut(Peeled<'_>) -> Result<(), StreamError>,
    ) -> Result<(), StreamError> {
        (self.visit)(value, f)
    }

    /// Wraps a boxed inner value.
    #[inline]
    pub fn wrap(&self, inner: Box<dyn Any>) -> Result<Box<dyn Any>, AccessError> {
        (self.wrap)(inner)
    }

    /// Moves the inner value out; `Ok(None)` for an empty option.
    ///
    /// Fails, returning the wrapper untouched, when the value is shared.
    #[inline]
    pub fn unwrap(&self, value: Box<dyn Any>) -> Result<Option<Box<dyn Any>>, Box<dyn Any>> {
        (self.unwrap)(value)
    }

    /// The empty value of a nullable wrapper.
    #[inline]
    pub fn none(&self) -> Option<Box<dyn Any>> {
        self.none.map(|none| none())
    }
}

// -----------------------------------------------------------------------------
// Flavors

impl WrapperKind {
    pub fn option<T: Bind>() -> Self {
        Self {
            inner: TypeHandle::of::<T>(),
            flavor: WrapperFlavor::Nullable,
            config: None,
            visit: |value, f| match value.downcast_ref::<Option<T>>() {
                Some(Some(inner)) => f(Peeled::Inner(inner)),
                Some(None) => f(Peeled::Null),
                None => f(Peeled::Failed(AccessError::mismatch::<Option<T>>())),
            },
            wrap: |inner| Ok(Box::new(Some(*downcast_box::<T>(inner)?)) as Box<dyn Any>),
            unwrap: |value| match value.downcast::<Option<T>>() {
                Ok(option) => Ok(option.map(|inner| Box::new(inner) as Box<dyn Any>)),
                Err(value) => Err(value),
            },
            none: Some(empty_option::<T> as fn() -> Box<dyn Any>),
        }
    }

    pub fn boxed<T: Bind>() -> Self {
        Self {
            inner: TypeHandle::of::<T>(),
            flavor: WrapperFlavor::Boxed,
            config: None,
            visit: |value, f| match value.downcast_ref::<Box<T>>() {
                Some(inner) => f(Peeled::Inner(&**inner)),
                None => f(Peeled::Failed(AccessError::mismatch::<Box<T>>())),
            },
            wrap: |inner| Ok(Box::new(downcast_box::<T>(inner)?) as Box<dyn Any>),
            unwrap: |value| match value.downcast::<Box<T>>() {
                Ok(boxed) => Ok(Some(*boxed as Box<dyn Any>)),
                Err(value) => Err(value),
            },
            none: None,
        }
    }

    pub fn rc<T: Bind>() -> Self {
        Self {
            inner: TypeHandle::of::<T>(),
            flavor: WrapperFlavor::Shared,
            config: None,
            visit: |value, f| match value.downcast_ref::<Rc<T>>() {
                Some(inner) => f(Peeled::Inner(&**inner)),
                None => f(Peeled::Failed(AccessError::mismatch::<Rc<T>>())),
            },
            wrap: |inner| Ok(Box::new(Rc::new(*downcast_box::<T>(inner)?)) as Box<dyn Any>),
            unwrap: |value| match value.downcast::<Rc<T>>() {
                Ok(rc) => match Rc::try_unwrap(*rc) {
                    Ok(inner) => Ok(Some(Box::new(inner) as Box<dyn Any>)),
                    Err(rc) => Err(Box::new(rc) as Box<dyn Any>),
                },
                Err(value) => Err(value),
            },
            none: None,
        }
    }

    pub fn arc<T: Bind + Send + Sync>() -> Self {
        Self {
            inner: TypeHandle::of::<T>(),
            flavor: WrapperFlavor::Shared,
            config: None,
            visit: |value, f| match value.downcast_ref::<Arc<T>>() {
                Some(inner) => f(Peeled::Inner(&**inner)),
                None => f(Peeled::Failed(AccessError::mismatch::<Arc<T>>())),
            },
            wrap: |inner| Ok(Box::new(Arc::new(*downcast_box::<T>(inner)?)) as Box<dyn Any>),
            unwrap: |value| match value.downcast::<Arc<T>>() {
                Ok(arc) => match Arc::try_unwrap(*arc) {
                    Ok(inner) => Ok(Some(Box::new(inner) as Box<dyn Any>)),
                    Err(arc) => Err(Box::new(arc) as Box<dyn Any>),
                },
                Err(value) => Err(value),
            },
            none: None,
        }
    }

    pub fn ref_cell<T: Bind>() -> Self {
        Self {
            inner: TypeHandle::of::<T>(),
            flavor: WrapperFlavor::Cell,
            config: None,
            visit: |value, f| match value.downcast_ref::<RefCell<T>>() {
                Some(cell) => match cell.try_borrow() {
                    Ok(inner) => f(Peeled::Inner(&*inner)),
                    Err(_) => f(Peeled::Failed(AccessError::Borrowed(type_name::<T>()))),
                },
                None => f(Peeled::Failed(AccessError::mismatch::<RefCell<T>>())),
            },
            wrap: |inner| Ok(Box::new(RefCell::new(*downcast_box::<T>(inner)?)) as Box<dyn Any>),
            unwrap: |value| match value.downcast::<RefCell<T>>() {
                Ok(cell) => Ok(Some(Box::new(cell.into_inner()) as Box<dyn Any>)),
                Err(value) => Err(value),
            },
            none: None,
        }
    }
}

fn empty_option<T: Any>() -> Box<dyn Any> {
    Box::new(None::<T>)
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;

    use super::{Peeled, WrapperKind};

    #[test]
    fn option_peels_and_wraps() {
        let kind = WrapperKind::option::<i32>();
        let mut seen = Vec::new();
        for value in [Some(4), None] {
            kind.visit(&value, &mut |peeled: Peeled<'_>| {
                seen.push(match peeled {
                    Peeled::Inner(v) => v.downcast_ref::<i32>().copied(),
                    _ => None,
                });
                Ok(())
            })
            .unwrap();
        }
        assert_eq!(seen, [Some(4), None]);

        let wrapped = kind.wrap(Box::new(7_i32)).unwrap();
        assert_eq!(wrapped.downcast_ref::<Option<i32>>(), Some(&Some(7)));
        assert!(kind.none().unwrap().downcast_ref::<Option<i32>>().unwrap().is_none());
    }

    #[test]
    fn shared_values_are_not_unwrapped() {
        let kind = WrapperKind::rc::<i32>();
        let shared = Rc::new(5_i32);
        let _other = Rc::clone(&shared);
        let back = kind.unwrap(Box::new(shared)).unwrap_err();
        assert!(back.downcast_ref::<Rc<i32>>().is_some());

        let alone = kind.unwrap(Box::new(Rc::new(6_i32))).unwrap().unwrap();
        assert_eq!(alone.downcast_ref::<i32>(), Some(&6));
    }
}
