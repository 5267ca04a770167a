//! Per-type conversion strategies.
//!
//! A [`Descriptor`] says how values of one Rust type are written to and
//! read from the event stream. Types provide their descriptor through
//! [`Bind`]; the [`Registry`](crate::Registry) builds each one once and
//! hands out clones.
//!
//! ## Menu
//!
//! - [`Bind`]: the registration hook implemented per type.
//! - [`TypeHandle`]: a lazy reference to another type's descriptor.
//! - [`Descriptor`] and its [`Kind`]:
//!     - scalars: `Bool`, [`IntegerKind`], [`DecimalKind`], `String`, `Bytes`;
//!     - containers: [`SequenceKind`], [`MapKind`], [`ObjectKind`];
//!     - [`EnumKind`] for named constants;
//!     - [`WrapperKind`] for `Option`, `Box`, `Rc`, `Arc` and `RefCell`;
//!     - [`Adapter`] for externally provided conversions.

// -----------------------------------------------------------------------------
// Modules

mod adapter;
mod enums;
mod map;
mod numeric;
mod object;
mod seq;
mod wrap;

// -----------------------------------------------------------------------------
// Exports

pub use adapter::Adapter;
pub use enums::{EnumBuilder, EnumKind};
pub use map::{MapKind, MapLike};
pub use numeric::{Decimal, DecimalKind, IntegerKind};
pub use object::{BuildKind, BuildStrategy, ObjectBuilder, ObjectKind, Property};
pub use object::{PropertyAccess, PropertyRef, UsePolicy};
pub use seq::{SequenceFlavor, SequenceKind, SeqLike};
pub use wrap::{Peeled, WrapperFlavor, WrapperKind};

pub(crate) use object::{Used, use_value};

use alloc::sync::Arc;
use core::any::{Any, TypeId, type_name};
use core::fmt;

use sp_policy::{Coercion, ElisionMask};
use sp_stream::{Number, Scalar, ScalarRef};

use crate::FieldConfig;

// -----------------------------------------------------------------------------
// Bind

/// Types that can be serialized and parsed.
///
/// The implementation builds the prototype descriptor. It runs once per
/// registry and must not depend on runtime state.
///
/// # Examples
///
/// ```
/// use sp_bind::{Bind, Descriptor, ObjectKind};
///
/// #[derive(Default)]
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// impl Bind for Point {
///     fn descriptor() -> Descriptor {
///         ObjectKind::builder::<Point>()
///             .field("x", |p| &p.x, |p| &mut p.x)
///             .field("y", |p| &p.y, |p| &mut p.y)
///             .constructed()
///             .finish()
///     }
/// }
/// ```
pub trait Bind: Any {
    fn descriptor() -> Descriptor;
}

// -----------------------------------------------------------------------------
// TypeHandle

/// A reference to a type whose descriptor is resolved on first use.
///
/// Descriptors refer to the types they contain through handles, so
/// recursive types never recurse while being built.
#[derive(Clone, Copy)]
pub struct TypeHandle {
    id: TypeId,
    name: &'static str,
    build: Option<fn() -> Descriptor>,
}

impl TypeHandle {
    /// A handle for a type with a [`Bind`] implementation.
    #[inline]
    pub fn of<T: Bind>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
            build: Some(T::descriptor),
        }
    }

    /// A handle for a type whose descriptor must be inserted into the
    /// registry by hand (see [`Registry::insert`](crate::Registry::insert)).
    #[inline]
    pub fn registered<T: Any>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
            build: None,
        }
    }

    #[inline]
    pub const fn id(&self) -> TypeId {
        self.id
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub(crate) const fn builder(&self) -> Option<fn() -> Descriptor> {
        self.build
    }
}

impl fmt::Debug for TypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypeHandle").field(&self.name).finish()
    }
}

// -----------------------------------------------------------------------------
// Kind

/// The conversion strategy of a descriptor.
#[derive(Clone)]
pub enum Kind {
    Bool,
    Integer(IntegerKind),
    Decimal(DecimalKind),
    String,
    /// [`bytes::Bytes`], written as a base64 string.
    Bytes,
    Sequence(SequenceKind),
    Map(MapKind),
    Enum(EnumKind),
    Object(ObjectKind),
    Wrapper(WrapperKind),
    Adapter(Arc<dyn Adapter>),
}

impl Kind {
    /// Short name used in diagnostics.
    pub const fn name(&self) -> &'static str {
        match self {
            Kind::Bool => "boolean",
            Kind::Integer(_) => "integer",
            Kind::Decimal(_) => "decimal",
            Kind::String => "string",
            Kind::Bytes => "bytes",
            Kind::Sequence(_) => "sequence",
            Kind::Map(_) => "map",
            Kind::Enum(_) => "enum",
            Kind::Object(_) => "object",
            Kind::Wrapper(_) => "wrapper",
            Kind::Adapter(_) => "adapter",
        }
    }
}

// -----------------------------------------------------------------------------
// Descriptor

/// The conversion strategy for one type plus its call-site customization.
///
/// Cloning is cheap: tables and accessors are shared behind `Arc`s, and
/// customizing a clone replaces shared parts instead of mutating them.
#[derive(Clone)]
pub struct Descriptor {
    type_id: TypeId,
    type_name: &'static str,
    kind: Kind,
    serialize: Option<ElisionMask>,
    parse: Option<ElisionMask>,
    coercion: Option<Coercion>,
    specific: Option<Scalar>,
}

impl Descriptor {
    /// Creates a descriptor for `T`.
    #[inline]
    pub fn new<T: Any>(kind: Kind) -> Self {
        Self::with_identity(TypeId::of::<T>(), type_name::<T>(), kind)
    }

    #[inline]
    pub(crate) const fn with_identity(type_id: TypeId, type_name: &'static str, kind: Kind) -> Self {
        Self {
            type_id,
            type_name,
            kind,
            serialize: None,
            parse: None,
            coercion: None,
            specific: None,
        }
    }

    /// A descriptor converting `T` through `adapter`.
    #[inline]
    pub fn adapter<T: Any>(adapter: impl Adapter) -> Self {
        Self::new::<T>(Kind::Adapter(Arc::new(adapter)))
    }

    /// The stand-in for a type nobody described: an object without
    /// properties that cannot be built.
    pub(crate) fn opaque(handle: &TypeHandle) -> Self {
        Self::with_identity(handle.id(), handle.name(), Kind::Object(ObjectKind::empty(handle.name())))
    }

    #[inline]
    pub const fn type_id(&self) -> TypeId {
        self.type_id
    }

    #[inline]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    #[inline]
    pub const fn kind(&self) -> &Kind {
        &self.kind
    }

    /// Serialize mask replacing the call policy's, if any.
    #[inline]
    pub const fn serialize_mask(&self) -> Option<ElisionMask> {
        self.serialize
    }

    /// Parse mask replacing the call policy's, if any.
    #[inline]
    pub const fn parse_mask(&self) -> Option<ElisionMask> {
        self.parse
    }

    #[inline]
    pub const fn coercion(&self) -> Option<Coercion> {
        self.coercion
    }

    #[inline]
    pub const fn specific(&self) -> Option<&Scalar> {
        self.specific.as_ref()
    }

    #[inline]
    pub fn with_serialize_mask(mut self, mask: ElisionMask) -> Self {
        self.serialize = Some(mask);
        self
    }

    #[inline]
    pub fn with_parse_mask(mut self, mask: ElisionMask) -> Self {
        self.parse = Some(mask);
        self
    }

    #[inline]
    pub fn with_coercion(mut self, coercion: Coercion) -> Self {
        self.coercion = Some(coercion);
        self
    }

    #[inline]
    pub fn with_specific(mut self, value: impl Into<Scalar>) -> Self {
        self.specific = Some(value.into());
        self
    }

    /// Applies declaration-site settings to this descriptor.
    pub fn configure(&mut self, config: &FieldConfig) {
        if config.serialize.is_some() {
            self.serialize = config.serialize;
        }
        if config.parse.is_some() {
            self.parse = config.parse;
        }
        if config.coercion.is_some() {
            self.coercion = config.coercion;
        }
        if let Some(specific) = &config.specific {
            self.specific = Some(specific.clone());
        }

        match &mut self.kind {
            Kind::Integer(kind) => {
                if let Some(bounds) = config.int_bounds {
                    kind.restrict(bounds);
                }
            }
            Kind::Decimal(kind) => {
                if let Some(bounds) = config.float_bounds {
                    kind.restrict(bounds);
                }
            }
            Kind::Enum(kind) => {
                if let Some(format) = config.name_format {
                    kind.reformat(format);
                }
            }
            Kind::Object(kind) => {
                if let Some(build) = &config.build {
                    if build.target() == self.type_id {
                        kind.set_build(build.clone());
                    } else {
                        log::warn!(
                            "ignoring a build strategy for `{}` configured on `{}`",
                            build.target_name(),
                            self.type_name,
                        );
                    }
                }
                if let Some(policy) = config.use_policy {
                    kind.set_use_policy(policy);
                }
            }
            Kind::Wrapper(kind) => kind.set_config(config.clone()),
            _ => {}
        }
    }
}

impl fmt::Debug for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Descriptor")
            .field("type", &self.type_name)
            .field("kind", &self.kind.name())
            .field("serialize", &self.serialize)
            .field("parse", &self.parse)
            .field("coercion", &self.coercion)
            .field("specific", &self.specific)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Sentinel

/// Compares a value with a descriptor sentinel.
///
/// Numbers compare by value, so `-1` matches `-1.0`.
pub(crate) fn matches_specific(specific: &Scalar, value: ScalarRef<'_>) -> bool {
    match (specific, value) {
        (Scalar::Number(Number::Int(a)), ScalarRef::Number(Number::Int(b))) => *a == b,
        (Scalar::Number(a), ScalarRef::Number(b)) => a.as_f64() == b.as_f64(),
        _ => value == *specific,
    }
}
