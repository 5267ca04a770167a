//! Descriptor-driven conversion between Rust values and stream events.
//!
//! Every type taking part in a conversion has a [`Descriptor`]: an
//! explicit, type-erased recipe saying how its values are written and
//! rebuilt. The [`Registry`] caches one prototype per type, the
//! [`Serializer`] walks a value and pushes events into any
//! [`StreamConsumer`](sp_stream::StreamConsumer), and the [`Parser`] is a
//! consumer that builds a value back.
//!
//! ## Menu
//!
//! - [`Bind`]: how a type provides its descriptor.
//! - [`Descriptor`], [`Kind`] and the per-kind tables in [`descriptor`].
//! - [`FieldConfig`]: declaration-site settings (bounds, masks, names, ...).
//! - [`Registry`]: the prototype cache, plus `submit_descriptor!` with the
//!   `auto_register` feature.
//! - [`Serializer`]: value to events, with cycle detection.
//! - [`Parser`]: events to value, including merging into an existing one.
//! - [`Outcome`]: value, null or undefined.
//!
//! ## Round trip
//!
//! ```
//! use sp_bind::{Bind, Descriptor, ObjectKind, Outcome, Parser, Registry, Serializer};
//! use sp_stream::json::ValueBuilder;
//!
//! #[derive(Default, Debug, PartialEq)]
//! struct Tag {
//!     label: String,
//!     weight: Option<f64>,
//! }
//!
//! impl Bind for Tag {
//!     fn descriptor() -> Descriptor {
//!         ObjectKind::builder::<Tag>()
//!             .field("label", |t| &t.label, |t| &mut t.label)
//!             .field("weight", |t| &t.weight, |t| &mut t.weight)
//!             .constructed()
//!             .finish()
//!     }
//! }
//!
//! let registry = Registry::new();
//! let tag = Tag { label: "hot".into(), weight: Some(0.5) };
//!
//! let mut out = ValueBuilder::default();
//! Serializer::new(&registry).serialize(&tag, &mut out).unwrap();
//! let json = out.finish().unwrap();
//! assert_eq!(json, serde_json::json!({ "label": "hot", "weight": 0.5 }));
//!
//! let mut parser = Parser::<Tag>::new(&registry);
//! sp_stream::json::emit_value(&json, &mut parser).unwrap();
//! assert_eq!(parser.finish().unwrap(), Outcome::Value(tag));
//! ```

// -----------------------------------------------------------------------------
// Compilation config

/// Some macros used for compilation control.
pub mod cfg {
    sp_cfg::define_alias! {
        #[cfg(feature = "auto_register")] => auto_register,
        #[cfg(all(debug_assertions, feature = "debug"))] => debug,
    }
}

// -----------------------------------------------------------------------------
// Extern crates

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod config;
mod error;
mod format;
mod impls;
mod outcome;
mod registry;

pub mod de;
pub mod descriptor;
pub mod ser;

#[cfg(test)]
mod testing;

// -----------------------------------------------------------------------------
// Top-Level exports

#[doc(hidden)]
pub mod __macro_exports;

pub use config::FieldConfig;
pub use de::{BuildContext, Parser};
pub use descriptor::{Adapter, Bind, Descriptor, Kind, TypeHandle};
pub use descriptor::{BuildKind, BuildStrategy, ObjectBuilder, ObjectKind, Property, UsePolicy};
pub use descriptor::{DecimalKind, EnumBuilder, EnumKind, IntegerKind, MapKind, SequenceKind, WrapperKind};
pub use error::AccessError;
pub use format::NameFormat;
pub use outcome::Outcome;
pub use registry::Registry;
pub use ser::Serializer;
