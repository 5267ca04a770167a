use core::any::Any;

use sp_policy::{Coercion, CoercionFailure, Elide};
use sp_stream::{ScalarRef, StreamConsumer, StreamError};

/// An externally provided conversion for one type.
///
/// Adapters cover types that have no [`Bind`](crate::Bind) implementation
/// (foreign types, or types with a custom textual form). They write one
/// complete value and parse from a single scalar.
///
/// # Examples
///
/// ```
/// use core::any::Any;
/// use core::net::Ipv4Addr;
///
/// use sp_bind::{Adapter, Descriptor, Registry};
/// use sp_policy::{Coercion, CoercionFailure};
/// use sp_stream::{ScalarRef, StreamConsumer, StreamError};
///
/// struct Ipv4Text;
///
/// impl Adapter for Ipv4Text {
///     fn serialize(&self, value: &dyn Any, out: &mut dyn StreamConsumer) -> Result<(), StreamError> {
///         match value.downcast_ref::<Ipv4Addr>() {
///             Some(addr) => out.string_value(&addr.to_string()),
///             None => out.null_value(),
///         }
///     }
///
///     fn parse(&self, value: ScalarRef<'_>, _: Coercion) -> Result<Box<dyn Any>, CoercionFailure> {
///         match value {
///             ScalarRef::Str(text) => text
///                 .parse::<Ipv4Addr>()
///                 .map(|addr| Box::new(addr) as Box<dyn Any>)
///                 .map_err(|_| CoercionFailure::mismatch("IPv4 address", "string")),
///             other => Err(CoercionFailure::mismatch("string", other.kind_name())),
///         }
///     }
/// }
///
/// let registry = Registry::new();
/// registry.insert(Descriptor::adapter::<Ipv4Addr>(Ipv4Text));
/// assert!(registry.contains::<Ipv4Addr>());
/// ```
pub trait Adapter: Send + Sync + 'static {
    /// Writes `value` as exactly one JSON value.
    fn serialize(&self, value: &dyn Any, out: &mut dyn StreamConsumer) -> Result<(), StreamError>;

    /// Builds a value from a scalar.
    fn parse(&self, value: ScalarRef<'_>, coercion: Coercion) -> Result<Box<dyn Any>, CoercionFailure>;

    /// Elision conditions `value` holds; none by default.
    fn conditions(&self, value: &dyn Any) -> Elide {
        let _ = value;
        Elide::empty()
    }
}
