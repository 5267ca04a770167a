use alloc::borrow::Cow;
use alloc::sync::Arc;
use core::any::Any;
use core::marker::PhantomData;

use crate::NameFormat;
use crate::descriptor::{Descriptor, Kind};

// -----------------------------------------------------------------------------
// Table

/// Declared constants, shared by every clone of a descriptor.
struct Constants {
    declared: Vec<Cow<'static, str>>,
    values: Vec<Box<dyn Any + Send + Sync>>,
    default: Option<usize>,
    eq: fn(&dyn Any, &dyn Any) -> bool,
    clone: fn(&dyn Any) -> Option<Box<dyn Any>>,
}

/// A type with a fixed set of named constants.
///
/// The declared names are formatted once; customizing the format on a
/// clone builds a new name table and leaves the shared constants alone.
#[derive(Clone)]
pub struct EnumKind {
    constants: Arc<Constants>,
    names: Arc<[String]>,
    format: NameFormat,
}

impl EnumKind {
    /// Starts a table for `T`.
    #[inline]
    pub fn builder<T: PartialEq + Clone + Send + Sync + Any>() -> EnumBuilder<T> {
        EnumBuilder {
            entries: Vec::new(),
            default: None,
            format: NameFormat::Verbatim,
            marker: PhantomData,
        }
    }

    #[inline]
    pub const fn format(&self) -> NameFormat {
        self.format
    }

    /// Rebuilds the wire names with `format`.
    pub fn reformat(&mut self, format: NameFormat) {
        if format != self.format {
            self.names = format_names(&self.constants.declared, format);
            self.format = format;
        }
    }

    /// Position of `value` in the table.
    pub fn index_of(&self, value: &dyn Any) -> Option<usize> {
        let eq = self.constants.eq;
        self.constants
            .values
            .iter()
            .position(|constant| eq(&**constant as &dyn Any, value))
    }

    /// Position of the constant spelled `name` on the wire.
    pub fn index_of_name(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    #[inline]
    pub fn name(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    #[inline]
    pub fn default_index(&self) -> Option<usize> {
        self.constants.default
    }

    /// A fresh copy of the constant at `index`.
    pub fn make(&self, index: usize) -> Option<Box<dyn Any>> {
        let constant = self.constants.values.get(index)?;
        (self.constants.clone)(&**constant as &dyn Any)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.names.len()
    }
}

fn format_names(declared: &[Cow<'static, str>], format: NameFormat) -> Arc<[String]> {
    declared.iter().map(|name| format.apply(name)).collect()
}

fn erased_eq<T: PartialEq + Any>(a: &dyn Any, b: &dyn Any) -> bool {
    match (a.downcast_ref::<T>(), b.downcast_ref::<T>()) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

fn erased_clone<T: Clone + Any>(value: &dyn Any) -> Option<Box<dyn Any>> {
    value
        .downcast_ref::<T>()
        .map(|v| Box::new(v.clone()) as Box<dyn Any>)
}

// -----------------------------------------------------------------------------
// Builder

/// Builds the descriptor of a constant table.
///
/// ```
/// use sp_bind::{Bind, Descriptor, EnumKind, NameFormat};
///
/// #[derive(Clone, PartialEq)]
/// enum Shade {
///     LightGray,
///     DarkGray,
/// }
///
/// impl Bind for Shade {
///     fn descriptor() -> Descriptor {
///         EnumKind::builder::<Shade>()
///             .variant("LightGray", Shade::LightGray)
///             .variant("DarkGray", Shade::DarkGray)
///             .default(Shade::LightGray)
///             .name_format(NameFormat::Kebab)
///             .finish()
///     }
/// }
/// ```
pub struct EnumBuilder<T> {
    entries: Vec<(Cow<'static, str>, T)>,
    default: Option<T>,
    format: NameFormat,
    marker: PhantomData<fn() -> T>,
}

impl<T: PartialEq + Clone + Send + Sync + Any> EnumBuilder<T> {
    pub fn variant(mut self, name: impl Into<Cow<'static, str>>, value: T) -> Self {
        self.entries.push((name.into(), value));
        self
    }

    /// The constant used when a parsed name is not in the table.
    pub fn default(mut self, value: T) -> Self {
        self.default = Some(value);
        self
    }

    pub fn name_format(mut self, format: NameFormat) -> Self {
        self.format = format;
        self
    }

    pub fn finish(self) -> Descriptor {
        let default = self.default.and_then(|default| {
            let found = self.entries.iter().position(|(_, v)| *v == default);
            if found.is_none() {
                log::warn!(
                    "default constant of `{}` is not in its table",
                    core::any::type_name::<T>()
                );
            }
            found
        });

        let (declared, values): (Vec<_>, Vec<_>) = self
            .entries
            .into_iter()
            .map(|(name, value)| (name, Box::new(value) as Box<dyn Any + Send + Sync>))
            .unzip();

        let names = format_names(&declared, self.format);
        let constants = Constants {
            declared,
            values,
            default,
            eq: erased_eq::<T>,
            clone: erased_clone::<T>,
        };

        Descriptor::new::<T>(Kind::Enum(EnumKind {
            constants: Arc::new(constants),
            names,
            format: self.format,
        }))
    }
}

#[cfg(test)]
mod tests {
    use crate::NameFormat;
    use crate::descriptor::{EnumKind, Kind};

    #[derive(Clone, Copy, Debug, PartialEq)]
    enum Level {
        Low,
        High,
        Extreme,
    }

    fn kind() -> EnumKind {
        let descriptor = EnumKind::builder::<Level>()
            .variant("LowLevel", Level::Low)
            .variant("HighLevel", Level::High)
            .default(Level::Low)
            .finish();
        match descriptor.kind() {
            Kind::Enum(kind) => kind.clone(),
            _ => unreachable!(),
        }
    }

    #[test]
    fn lookups() {
        let kind = kind();
        assert_eq!(kind.index_of(&Level::High), Some(1));
        assert_eq!(kind.index_of(&Level::Extreme), None);
        assert_eq!(kind.index_of_name("LowLevel"), Some(0));
        assert_eq!(kind.default_index(), Some(0));
        let made = kind.make(1).unwrap();
        assert_eq!(made.downcast_ref::<Level>(), Some(&Level::High));
    }

    #[test]
    fn reformat_only_touches_the_clone() {
        let original = kind();
        let mut custom = original.clone();
        custom.reformat(NameFormat::ScreamingSnake);

        assert_eq!(custom.name(1), Some("HIGH_LEVEL"));
        assert_eq!(custom.index_of_name("HIGH_LEVEL"), Some(1));
        assert_eq!(original.name(1), Some("HighLevel"));
    }
}
