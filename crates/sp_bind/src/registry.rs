use alloc::sync::Arc;
use core::any::{Any, TypeId};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use sp_utils::TypeIdMap;

use crate::FieldConfig;
use crate::descriptor::{Bind, Descriptor, TypeHandle};

// -----------------------------------------------------------------------------
// Registry

/// The cache of prototype descriptors.
///
/// Every type is described once; callers receive clones, and call-site
/// settings are applied to the clone only. The registry can be shared
/// between threads: lookups take a read lock, and a descriptor built
/// concurrently by two callers is published by whichever finishes first.
///
/// # Examples
///
/// ```
/// use sp_bind::{FieldConfig, Registry};
///
/// let registry = Registry::new();
/// let narrow = registry.resolve::<i32>(Some(&FieldConfig::new().int_bounds(0, 10)));
/// let plain = registry.resolve::<i32>(None);
///
/// assert_eq!(narrow.type_name(), plain.type_name());
/// assert!(registry.contains::<i32>());
/// ```
pub struct Registry {
    prototypes: RwLock<TypeIdMap<Arc<Descriptor>>>,
}

impl Default for Registry {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Creates an empty registry; descriptors are built on first use.
    #[inline]
    pub const fn new() -> Self {
        Self {
            prototypes: RwLock::new(TypeIdMap::new()),
        }
    }

    /// A customized clone of `T`'s descriptor.
    #[inline]
    pub fn resolve<T: Bind>(&self, config: Option<&FieldConfig>) -> Descriptor {
        self.resolve_handle(&TypeHandle::of::<T>(), config)
    }

    /// A customized clone of the descriptor behind `handle`.
    pub fn resolve_handle(&self, handle: &TypeHandle, config: Option<&FieldConfig>) -> Descriptor {
        let mut descriptor = Descriptor::clone(&self.prototype(handle));
        if let Some(config) = config {
            descriptor.configure(config);
        }
        descriptor
    }

    /// The shared prototype behind `handle`, built on first use.
    ///
    /// A handle without a [`Bind`] implementation whose descriptor was never
    /// inserted resolves to an empty object, and a warning is logged.
    pub fn prototype(&self, handle: &TypeHandle) -> Arc<Descriptor> {
        if let Some(found) = self.read().get(&handle.id()) {
            return Arc::clone(found);
        }

        // Built outside the lock: descriptors of recursive types only hold
        // handles, but a builder may still resolve other types.
        let built = match handle.builder() {
            Some(build) => build(),
            None => {
                log::warn!("`{}` has no descriptor, treating it as an empty object", handle.name());
                Descriptor::opaque(handle)
            }
        };

        let mut prototypes = self.write();
        Arc::clone(prototypes.get_or_insert(handle.id(), || Arc::new(built)))
    }

    /// Registers a descriptor, replacing the cached one for the same type.
    ///
    /// Inserted descriptors take precedence over [`Bind`] implementations.
    pub fn insert(&self, descriptor: Descriptor) -> Option<Arc<Descriptor>> {
        let type_id = descriptor.type_id();
        self.write().insert(type_id, Arc::new(descriptor))
    }

    #[inline]
    pub fn contains<T: Any>(&self) -> bool {
        self.contains_id(&TypeId::of::<T>())
    }

    #[inline]
    pub fn contains_id(&self, type_id: &TypeId) -> bool {
        self.read().contains(type_id)
    }

    /// Number of cached descriptors.
    #[inline]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Inserts every descriptor submitted with [`submit_descriptor!`](crate::submit_descriptor).
    ///
    /// Returns `false`, doing nothing, when the `auto_register` feature is
    /// disabled.
    #[cfg_attr(not(feature = "auto_register"), inline(always))]
    pub fn auto_register(&self) -> bool {
        crate::cfg::auto_register! {
            if {
                use crate::__macro_exports::auto_register::{Submission, inventory};
                for Submission(build) in inventory::iter::<Submission> {
                    self.insert(build());
                }
                true
            } else {
                false
            }
        }
    }

    #[inline]
    fn read(&self) -> RwLockReadGuard<'_, TypeIdMap<Arc<Descriptor>>> {
        self.prototypes.read().unwrap_or_else(PoisonError::into_inner)
    }

    #[inline]
    fn write(&self) -> RwLockWriteGuard<'_, TypeIdMap<Arc<Descriptor>>> {
        self.prototypes.write().unwrap_or_else(PoisonError::into_inner)
    }
}

// -----------------------------------------------------------------------------
// Submission

/// Submits a descriptor for [`Registry::auto_register`].
///
/// `submit_descriptor!(Type)` submits `<Type as Bind>::descriptor`;
/// `submit_descriptor!(Type => function)` submits any `fn() -> Descriptor`.
/// Expands to nothing without the `auto_register` feature.
#[cfg(feature = "auto_register")]
#[macro_export]
macro_rules! submit_descriptor {
    ($ty:ty) => {
        $crate::submit_descriptor!($ty => <$ty as $crate::Bind>::descriptor);
    };
    ($ty:ty => $build:expr) => {
        $crate::__macro_exports::auto_register::inventory::submit! {
            $crate::__macro_exports::auto_register::Submission($build)
        }
    };
}

/// Submits a descriptor for [`Registry::auto_register`].
///
/// Expands to nothing: the `auto_register` feature is disabled.
#[cfg(not(feature = "auto_register"))]
#[macro_export]
macro_rules! submit_descriptor {
    ($($tt:tt)*) => {};
}

#[cfg(test)]
mod tests {
    use alloc::sync::Arc;

    use sp_policy::Bounds;

    use super::Registry;
    use crate::FieldConfig;
    use crate::descriptor::{Kind, TypeHandle};

    fn int_bounds(kind: &Kind) -> Bounds<i64> {
        match kind {
            Kind::Integer(kind) => kind.bounds(),
            _ => panic!("not an integer"),
        }
    }

    #[test]
    fn registry_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Registry>();
    }

    #[test]
    fn prototypes_are_built_once() {
        let registry = Registry::new();
        let first = registry.prototype(&TypeHandle::of::<u16>());
        let second = registry.prototype(&TypeHandle::of::<u16>());
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn customization_never_reaches_the_cache() {
        let registry = Registry::new();
        let config = FieldConfig::new().int_bounds(0, 100);

        let custom = registry.resolve::<i32>(Some(&config));
        assert_eq!(int_bounds(custom.kind()), Bounds::new(0, 100));

        let plain = registry.resolve::<i32>(None);
        assert_eq!(int_bounds(plain.kind()), Bounds::new(i32::MIN as i64, i32::MAX as i64));
    }

    #[test]
    fn unknown_types_resolve_to_empty_objects() {
        struct Unknown;

        let registry = Registry::new();
        let descriptor = registry.resolve_handle(&TypeHandle::registered::<Unknown>(), None);
        match descriptor.kind() {
            Kind::Object(kind) => assert!(kind.properties().is_empty()),
            _ => panic!("expected an object"),
        }
        assert!(registry.contains::<Unknown>());
    }

    #[test]
    fn inserted_descriptors_replace_cached_ones() {
        let registry = Registry::new();
        registry.resolve::<u8>(None);
        let custom = registry.resolve::<u8>(Some(&FieldConfig::new().int_bounds(1, 9)));
        assert!(registry.insert(custom).is_some());
        assert_eq!(int_bounds(registry.resolve::<u8>(None).kind()), Bounds::new(1, 9));
    }

    #[test]
    fn auto_register_matches_feature() {
        let registry = Registry::new();
        assert_eq!(registry.auto_register(), cfg!(feature = "auto_register"));
    }
}
