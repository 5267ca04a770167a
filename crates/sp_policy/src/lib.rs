//! The conversion policy language.
//!
//! A policy decides, per value, whether it is written, omitted together
//! with its key, or replaced by `null` ([`Elision`]), and how incoming
//! numbers are brought into range ([`Coercion`], [`Bounds`]).
//!
//! - [`Elide`]: the conditions a value can be in (null, empty string, NaN, ...).
//! - [`ElisionMask`]: an omit sub-mask and a null sub-mask in one `u32`,
//!   separated by [`NULL_SHIFT`].
//! - [`ConversionPolicy`]: a serialize mask, a parse mask and coercion flags.
//! - [`coerce_integer`], [`coerce_decimal_to_integer`], [`coerce_decimal`]:
//!   range checks shared by every numeric descriptor.

// -----------------------------------------------------------------------------
// Modules

mod bounds;
mod coercion;
mod elide;
mod numeric;
mod policy;

// -----------------------------------------------------------------------------
// Exports

pub use bounds::Bounds;
pub use coercion::{Coercion, Rounding};
pub use elide::{Elide, Elision, ElisionMask, NULL_SHIFT};
pub use numeric::{CoercionFailure, coerce_decimal, coerce_decimal_to_integer, coerce_integer};
pub use policy::ConversionPolicy;
